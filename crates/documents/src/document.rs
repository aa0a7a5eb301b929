use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estoque_core::{DomainError, DomainResult, DocumentId, LocationId, ProductId};

/// Commercial document status lifecycle. Wire values are the legacy
/// Portuguese names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentStatus {
    #[serde(rename = "RASCUNHO")]
    Rascunho,
    #[serde(rename = "PENDENTE")]
    Pendente,
    #[serde(rename = "APROVADA")]
    Aprovada,
    #[serde(rename = "FATURADA")]
    Faturada,
    #[serde(rename = "CANCELADA")]
    Cancelada,
}

impl DocumentStatus {
    /// Final statuses are the ones that take inventory effect.
    pub fn is_final(self) -> bool {
        matches!(self, DocumentStatus::Aprovada | DocumentStatus::Faturada)
    }

    pub fn is_cancelled(self) -> bool {
        matches!(self, DocumentStatus::Cancelada)
    }
}

/// One product line on a commercial document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    pub line_no: u32,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    pub quantity: Decimal,
    /// Cents. Carried by purchase lines; sales lines leave it out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

/// Outbound sale document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDocument {
    pub id: DocumentId,
    pub status: DocumentStatus,
    pub date: DateTime<Utc>,
    pub lines: Vec<DocumentLine>,
}

/// Inbound purchase document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDocument {
    pub id: DocumentId,
    pub status: DocumentStatus,
    pub date: DateTime<Utc>,
    pub lines: Vec<DocumentLine>,
}

macro_rules! impl_status_transitions {
    ($t:ty, $label:literal) => {
        impl $t {
            /// Move to APROVADA. Only pending or draft documents qualify.
            pub fn approve(&self) -> DomainResult<Self> {
                match self.status {
                    DocumentStatus::Rascunho | DocumentStatus::Pendente => Ok(Self {
                        status: DocumentStatus::Aprovada,
                        ..self.clone()
                    }),
                    _ => Err(DomainError::invariant(concat!(
                        "only draft or pending ",
                        $label,
                        " documents can be approved"
                    ))),
                }
            }

            /// Move to FATURADA. Only approved documents qualify.
            pub fn invoice(&self) -> DomainResult<Self> {
                match self.status {
                    DocumentStatus::Aprovada => Ok(Self {
                        status: DocumentStatus::Faturada,
                        ..self.clone()
                    }),
                    _ => Err(DomainError::invariant(concat!(
                        "only approved ",
                        $label,
                        " documents can be invoiced"
                    ))),
                }
            }

            /// Move to CANCELADA. Final documents can no longer be cancelled.
            pub fn cancel(&self) -> DomainResult<Self> {
                if self.status.is_final() {
                    return Err(DomainError::invariant(concat!(
                        "a final ",
                        $label,
                        " document cannot be cancelled"
                    )));
                }
                Ok(Self {
                    status: DocumentStatus::Cancelada,
                    ..self.clone()
                })
            }
        }
    };
}

impl_status_transitions!(SaleDocument, "sale");
impl_status_transitions!(PurchaseDocument, "purchase");
