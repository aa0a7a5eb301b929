//! Document-transition driven movement orchestration.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use estoque_core::{DocumentId, ItemId, MovementId, ProductId};
use estoque_documents::{DocumentLine, PurchaseDocument, SaleDocument};
use estoque_inventory::{
    apply_movement, release, reserve, resolve_for_release, resolve_for_reserve, DedupeKey,
    InventoryItem, ItemPatch, MovementRequest, MovementType, NegativeBalancePolicy, OriginKind,
    ReservationError, ValidationOutcome,
};

use crate::audit::{self, AuditEvent, AuditEventKind, AuditNotifier};
use crate::store::{InventoryStore, ItemFilter, StoreError};

/// What one successfully processed line did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "effect")]
pub enum LineEffect {
    MovementRecorded { movement_id: MovementId },
    /// The persistence layer already held this movement's fingerprint: the
    /// transition was re-processed and the line is a no-op.
    MovementAlreadyRecorded,
    Reserved { quantity: Decimal },
    Released { quantity: Decimal },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedLine {
    pub line_no: u32,
    pub item_id: ItemId,
    #[serde(flatten)]
    pub effect: LineEffect,
}

/// Why one line failed. Siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum LineFailureKind {
    ItemNotFound,
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },
    Rejected {
        errors: ValidationOutcome,
    },
}

impl From<ReservationError> for LineFailureKind {
    fn from(err: ReservationError) -> Self {
        match err {
            ReservationError::ItemNotFound => LineFailureKind::ItemNotFound,
            ReservationError::InsufficientBalance {
                requested,
                available,
            } => LineFailureKind::InsufficientBalance {
                requested,
                available,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFailure {
    pub line_no: u32,
    pub product_id: ProductId,
    #[serde(flatten)]
    pub kind: LineFailureKind,
}

/// Per-document result: applied lines plus accumulated failures. The
/// document-level operation is "partially applied" rather than atomic; the
/// caller decides whether to retry the failed lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentOutcome {
    pub document_id: DocumentId,
    pub applied: Vec<AppliedLine>,
    pub failures: Vec<LineFailure>,
}

impl DocumentOutcome {
    fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            applied: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        !self.applied.is_empty() && !self.failures.is_empty()
    }
}

/// Drives inventory effects of commercial document transitions.
///
/// One read-modify-write cycle per item per operation: every line re-fetches
/// a fresh snapshot before computing its delta, minimizing (not eliminating)
/// lost-update risk against concurrent writers. Idempotency comes from the
/// store's dedupe-key rejection, not from rollback logs.
pub struct MovementOrchestrator<S> {
    store: S,
    policy: NegativeBalancePolicy,
    notifier: Option<Arc<dyn AuditNotifier>>,
}

impl<S: InventoryStore> MovementOrchestrator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: NegativeBalancePolicy::default(),
            notifier: None,
        }
    }

    pub fn with_policy(mut self, policy: NegativeBalancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn AuditNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Earmark stock for a sale at creation/quote time, independent of the
    /// final transition.
    pub async fn reserve_for_sale(
        &self,
        sale: &SaleDocument,
    ) -> Result<DocumentOutcome, StoreError> {
        let mut outcome = DocumentOutcome::new(sale.id);

        for line in active_lines(&sale.lines) {
            let Some(item) = self.fresh_snapshot_for_reserve(line).await? else {
                self.fail_line(&mut outcome, sale.id, line, LineFailureKind::ItemNotFound);
                continue;
            };

            match reserve(&item, line.quantity) {
                Err(err) => self.fail_line(&mut outcome, sale.id, line, err.into()),
                Ok((updated, delta)) => {
                    self.store
                        .update_item(
                            item.id,
                            ItemPatch::reservation(
                                updated.reserved_quantity,
                                item.version,
                            ),
                        )
                        .await?;
                    debug!(item = %item.id, quantity = %delta.applied(), "reserved for sale");
                    outcome.applied.push(AppliedLine {
                        line_no: line.line_no,
                        item_id: item.id,
                        effect: LineEffect::Reserved {
                            quantity: delta.applied(),
                        },
                    });
                    audit::dispatch(
                        self.notifier.as_ref(),
                        AuditEvent::new(AuditEventKind::ReservationCreated, sale.id, line.product_id)
                            .with_item(item.id),
                    );
                }
            }
        }

        info!(document = %sale.id, applied = outcome.applied.len(),
              failed = outcome.failures.len(), "sale reservation processed");
        Ok(outcome)
    }

    /// Emit SAIDA movements for a sale that reached a final status, and
    /// release the reservations taken at quote time. Non-final documents are
    /// a no-op.
    ///
    /// Lines resolve to the stock record holding the line's reservation
    /// (greatest reserved quantity, exact location first), so the shipment
    /// and the release land on the record the quote earmarked.
    pub async fn fulfill_sale(&self, sale: &SaleDocument) -> Result<DocumentOutcome, StoreError> {
        let mut outcome = DocumentOutcome::new(sale.id);
        if !sale.status.is_final() {
            debug!(document = %sale.id, status = ?sale.status, "sale not final; no inventory effect");
            return Ok(outcome);
        }

        for line in active_lines(&sale.lines) {
            let Some(item) = self.fresh_snapshot_for_release(line).await? else {
                self.fail_line(&mut outcome, sale.id, line, LineFailureKind::ItemNotFound);
                continue;
            };

            let request = MovementRequest {
                item_id: Some(item.id),
                movement_type: MovementType::Saida,
                quantity: line.quantity,
                unit_cost: None,
                date: Some(sale.date),
                lot: line.lot.clone(),
                serial: line.serial.clone(),
                origin: OriginKind::Sale,
                origin_id: Some(sale.id.to_string()),
                location_id: item.location_id,
                notes: None,
                adjustment_direction: None,
            };

            self.emit_movement(&mut outcome, sale.id, line, &item, request, true)
                .await?;
        }

        info!(document = %sale.id, applied = outcome.applied.len(),
              failed = outcome.failures.len(), "sale fulfillment processed");
        Ok(outcome)
    }

    /// Emit ENTRADA movements for a purchase that reached a final status.
    /// Non-final documents are a no-op.
    pub async fn receive_purchase(
        &self,
        purchase: &PurchaseDocument,
    ) -> Result<DocumentOutcome, StoreError> {
        let mut outcome = DocumentOutcome::new(purchase.id);
        if !purchase.status.is_final() {
            debug!(document = %purchase.id, status = ?purchase.status,
                   "purchase not final; no inventory effect");
            return Ok(outcome);
        }

        for line in active_lines(&purchase.lines) {
            let Some(item) = self.fresh_snapshot_for_reserve(line).await? else {
                self.fail_line(&mut outcome, purchase.id, line, LineFailureKind::ItemNotFound);
                continue;
            };

            let request = MovementRequest {
                item_id: Some(item.id),
                movement_type: MovementType::Entrada,
                quantity: line.quantity,
                unit_cost: line.unit_cost,
                date: Some(purchase.date),
                lot: line.lot.clone(),
                serial: line.serial.clone(),
                origin: OriginKind::Purchase,
                origin_id: Some(purchase.id.to_string()),
                location_id: item.location_id,
                notes: None,
                adjustment_direction: None,
            };

            self.emit_movement(&mut outcome, purchase.id, line, &item, request, false)
                .await?;
        }

        info!(document = %purchase.id, applied = outcome.applied.len(),
              failed = outcome.failures.len(), "purchase receipt processed");
        Ok(outcome)
    }

    /// Release reservations for a cancelled sale, without emitting
    /// movements.
    pub async fn cancel_sale(&self, sale: &SaleDocument) -> Result<DocumentOutcome, StoreError> {
        let mut outcome = DocumentOutcome::new(sale.id);

        for line in active_lines(&sale.lines) {
            let Some(item) = self.fresh_snapshot_for_release(line).await? else {
                self.fail_line(&mut outcome, sale.id, line, LineFailureKind::ItemNotFound);
                continue;
            };

            let (updated, delta) = release(&item, line.quantity);
            self.store
                .update_item(
                    item.id,
                    ItemPatch::reservation(
                        updated.reserved_quantity,
                        item.version,
                    ),
                )
                .await?;
            outcome.applied.push(AppliedLine {
                line_no: line.line_no,
                item_id: item.id,
                effect: LineEffect::Released {
                    quantity: delta.applied().abs(),
                },
            });
            audit::dispatch(
                self.notifier.as_ref(),
                AuditEvent::new(AuditEventKind::ReservationReleased, sale.id, line.product_id)
                    .with_item(item.id),
            );
        }

        info!(document = %sale.id, released = outcome.applied.len(),
              failed = outcome.failures.len(), "sale cancellation processed");
        Ok(outcome)
    }

    /// Validate, persist and patch one line's movement. When
    /// `release_reservation` is set (sale fulfillment), the line's quantity
    /// is released in the same item patch.
    async fn emit_movement(
        &self,
        outcome: &mut DocumentOutcome,
        document_id: DocumentId,
        line: &DocumentLine,
        item: &InventoryItem,
        request: MovementRequest,
        release_reservation: bool,
    ) -> Result<(), StoreError> {
        let application = match apply_movement(item, &request, &self.policy) {
            Ok(application) => application,
            Err(errors) => {
                // A retried transition can fail validation because its first
                // run already moved the balance; consult the ledger before
                // reporting the rejection.
                let key = DedupeKey::for_request(&request);
                if self.store.movement_exists(&key).await? {
                    debug!(%key, item = %item.id, "rejection is a replay; movement already recorded");
                    outcome.applied.push(AppliedLine {
                        line_no: line.line_no,
                        item_id: item.id,
                        effect: LineEffect::MovementAlreadyRecorded,
                    });
                    audit::dispatch(
                        self.notifier.as_ref(),
                        AuditEvent::new(
                            AuditEventKind::MovementAlreadyRecorded,
                            document_id,
                            line.product_id,
                        )
                        .with_item(item.id),
                    );
                    return Ok(());
                }
                self.fail_line(outcome, document_id, line, LineFailureKind::Rejected { errors });
                return Ok(());
            }
        };

        match self.store.create_movement(item.id, application.payload).await {
            Ok(movement) => {
                let mut patch = application.patch;
                if release_reservation {
                    let (released, _) = release(item, line.quantity);
                    patch.reserved_quantity = Some(released.reserved_quantity);
                }
                self.store.update_item(item.id, patch).await?;

                outcome.applied.push(AppliedLine {
                    line_no: line.line_no,
                    item_id: item.id,
                    effect: LineEffect::MovementRecorded {
                        movement_id: movement.id,
                    },
                });
                audit::dispatch(
                    self.notifier.as_ref(),
                    AuditEvent::new(AuditEventKind::MovementRecorded, document_id, line.product_id)
                        .with_item(item.id),
                );
                if release_reservation {
                    audit::dispatch(
                        self.notifier.as_ref(),
                        AuditEvent::new(
                            AuditEventKind::ReservationReleased,
                            document_id,
                            line.product_id,
                        )
                        .with_item(item.id),
                    );
                }
            }
            Err(StoreError::Duplicate(key)) => {
                // Retried transition: the movement is already on ledger.
                // Skip the item patch too; its effect was applied the first
                // time around.
                debug!(%key, item = %item.id, "movement already recorded; skipping");
                outcome.applied.push(AppliedLine {
                    line_no: line.line_no,
                    item_id: item.id,
                    effect: LineEffect::MovementAlreadyRecorded,
                });
                audit::dispatch(
                    self.notifier.as_ref(),
                    AuditEvent::new(
                        AuditEventKind::MovementAlreadyRecorded,
                        document_id,
                        line.product_id,
                    )
                    .with_item(item.id),
                );
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    async fn fresh_snapshot_for_reserve(
        &self,
        line: &DocumentLine,
    ) -> Result<Option<InventoryItem>, StoreError> {
        let items = self
            .store
            .list_items(&ItemFilter::for_product(line.product_id))
            .await?;
        Ok(resolve_for_reserve(&items, line.location_id.as_ref()).cloned())
    }

    async fn fresh_snapshot_for_release(
        &self,
        line: &DocumentLine,
    ) -> Result<Option<InventoryItem>, StoreError> {
        let items = self
            .store
            .list_items(&ItemFilter::for_product(line.product_id))
            .await?;
        Ok(resolve_for_release(&items, line.location_id.as_ref()).cloned())
    }

    fn fail_line(
        &self,
        outcome: &mut DocumentOutcome,
        document_id: DocumentId,
        line: &DocumentLine,
        kind: LineFailureKind,
    ) {
        debug!(document = %document_id, line = line.line_no, ?kind, "line failed");
        audit::dispatch(
            self.notifier.as_ref(),
            AuditEvent::new(AuditEventKind::LineFailed, document_id, line.product_id),
        );
        outcome.failures.push(LineFailure {
            line_no: line.line_no,
            product_id: line.product_id,
            kind,
        });
    }
}

/// Lines with positive quantity; everything else has no inventory effect.
fn active_lines(lines: &[DocumentLine]) -> impl Iterator<Item = &DocumentLine> {
    lines.iter().filter(|line| line.quantity > Decimal::ZERO)
}
