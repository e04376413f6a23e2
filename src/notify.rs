use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// What happened to the request; the receiving automation picks a template.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    LeaveSubmitted,
    LeaveApproved,
    LeaveRejected,
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    kind: NotificationKind,
    recipient: &'a str,
    context: &'a Value,
}

/// Best-effort delivery to the configured webhook. Returns whether the event
/// was handed off; never errors, so a dead channel cannot fail a transition.
pub async fn notify(
    webhook_url: Option<&str>,
    recipient: &str,
    kind: NotificationKind,
    context: &Value,
) -> bool {
    let Some(url) = webhook_url else {
        info!(?kind, recipient, "Notification webhook not configured, skipping");
        return false;
    };

    let payload = WebhookPayload {
        kind,
        recipient,
        context,
    };

    match reqwest::Client::new().post(url).json(&payload).send().await {
        Ok(resp) if resp.status().is_success() => {
            info!(?kind, recipient, "Notification delivered");
            true
        }
        Ok(resp) => {
            warn!(?kind, recipient, status = %resp.status(), "Notification endpoint refused event");
            false
        }
        Err(e) => {
            warn!(?kind, recipient, error = %e, "Notification delivery failed");
            false
        }
    }
}

/// Fire-and-forget variant used after lifecycle transitions.
pub fn notify_detached(
    webhook_url: Option<String>,
    recipient: String,
    kind: NotificationKind,
    context: Value,
) {
    actix_web::rt::spawn(async move {
        notify(webhook_url.as_deref(), &recipient, kind, &context).await;
    });
}
