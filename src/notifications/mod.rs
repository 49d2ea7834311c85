//! Best-effort outbound notifications.
//!
//! Goal transitions emit a [`GoalEvent`]; the handler hands it to
//! [`dispatch_goal_event`], which runs delivery on its own task. Nothing
//! here can fail the request that produced the event.

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::goals::repo_types::GoalStatus;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Writes outgoing mail to the structured log instead of an SMTP relay.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    from: String,
}

impl LogNotifier {
    pub fn new(from: &str) -> Self {
        Self { from: from.to_string() }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, n: &Notification) -> anyhow::Result<()> {
        info!(from = %self.from, to = %n.to, subject = %n.subject, body = %n.body, "mail");
        Ok(())
    }
}

/// Emitted by a goal status transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalEvent {
    pub goal_id: i64,
    pub user_id: Uuid,
    pub status: GoalStatus,
}

pub fn goal_status_message(email: &str, status: GoalStatus) -> Notification {
    let name = email.split('@').next().unwrap_or(email);
    Notification {
        to: email.to_string(),
        subject: "Fitness Goal Update".into(),
        body: format!(
            "Hello {name},\n\nYour fitness goal status is now: {}.\n\nStay consistent!\nFitPlanner Team",
            status.label()
        ),
    }
}

/// Sends and swallows the outcome.
pub async fn deliver(notifier: &dyn Notifier, notification: Notification) {
    match notifier.send(&notification).await {
        Ok(()) => debug!(to = %notification.to, "notification sent"),
        Err(e) => warn!(error = %e, to = %notification.to, "notification failed; dropped"),
    }
}

/// Spawns delivery of the status mail for `event`. Returns immediately.
pub fn dispatch_goal_event(state: &AppState, event: GoalEvent) -> tokio::task::JoinHandle<()> {
    let db = state.db.clone();
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        let user = match User::find_by_id(&db, event.user_id).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(user_id = %event.user_id, goal_id = event.goal_id, "no user to notify");
                return;
            }
            Err(e) => {
                warn!(error = %e, goal_id = event.goal_id, "notification lookup failed; dropped");
                return;
            }
        };
        deliver(notifier.as_ref(), goal_status_message(&user.email, event.status)).await;
    })
}
