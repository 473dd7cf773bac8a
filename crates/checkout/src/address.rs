use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vendra_core::{AddressId, BuyerId, DomainError, DomainResult};

/// Shipping destination owned by a buyer.
///
/// Read-only from the placement workflow's perspective; the order header
/// references it by id. Placement does not verify the address belongs to the
/// ordering buyer (see DESIGN.md), only the address-book endpoints do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub buyer_id: BuyerId,
    pub title: String,
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated, not-yet-persisted address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub buyer_id: BuyerId,
    pub title: String,
    pub recipient_name: String,
    pub phone: String,
    pub detail: String,
}

impl NewAddress {
    pub fn new(
        buyer_id: BuyerId,
        title: impl Into<String>,
        recipient_name: impl Into<String>,
        phone: impl Into<String>,
        detail: impl Into<String>,
    ) -> DomainResult<Self> {
        let title = title.into().trim().to_string();
        let recipient_name = recipient_name.into().trim().to_string();
        let phone = phone.into().trim().to_string();
        let detail = detail.into().trim().to_string();

        if recipient_name.is_empty() {
            return Err(DomainError::validation("recipient name must not be empty"));
        }
        if detail.is_empty() {
            return Err(DomainError::validation("address detail must not be empty"));
        }

        Ok(Self {
            buyer_id,
            title,
            recipient_name,
            phone,
            detail,
        })
    }
}
