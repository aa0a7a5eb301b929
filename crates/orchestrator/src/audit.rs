//! Best-effort audit notification.
//!
//! Notifications are fire-and-forget: dispatched on a spawned task, failures
//! logged and swallowed. They never delay or fail the primary operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use estoque_core::{DocumentId, ItemId, ProductId};

/// What happened, for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditEventKind {
    MovementRecorded,
    MovementAlreadyRecorded,
    ReservationCreated,
    ReservationReleased,
    LineFailed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub kind: AuditEventKind,
    pub document_id: DocumentId,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(kind: AuditEventKind, document_id: DocumentId, product_id: ProductId) -> Self {
        Self {
            kind,
            document_id,
            product_id,
            item_id: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }
}

/// Audit sink (message queue, log aggregator, webhook; caller's choice).
#[async_trait]
pub trait AuditNotifier: Send + Sync + 'static {
    async fn notify(&self, event: AuditEvent) -> anyhow::Result<()>;
}

/// Dispatch without waiting. Notifier errors are logged at `warn` and
/// swallowed.
pub(crate) fn dispatch(notifier: Option<&Arc<dyn AuditNotifier>>, event: AuditEvent) {
    let Some(notifier) = notifier else {
        return;
    };
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        if let Err(error) = notifier.notify(event).await {
            warn!(%error, "audit notification failed");
        }
    });
}
