use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate an invoice code for an order placed at `now`.
///
/// The scheme is `INV-{unix seconds}-{8 hex}`. A timestamp alone collides for
/// placements within the same second, so the random tail of a UUIDv7 is
/// appended; the orders table additionally carries a UNIQUE constraint on the
/// code.
pub fn invoice_code(now: DateTime<Utc>) -> String {
    let entropy = Uuid::now_v7().simple().to_string();
    // The last 8 hex chars of a v7 UUID are from its random section.
    let suffix = &entropy[entropy.len() - 8..];
    format!("INV-{}-{}", now.timestamp(), suffix)
}
