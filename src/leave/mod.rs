pub mod balance;
pub mod calendar;
pub mod catalog;
pub mod engine;
pub mod report;
pub mod rules;
