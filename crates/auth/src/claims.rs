use serde::{Deserialize, Serialize};

use vendra_core::BuyerId;

/// Claims carried by a buyer's access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Buyer the token was issued to.
    pub sub: BuyerId,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}
