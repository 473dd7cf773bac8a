use vendra_core::BuyerId;

/// Authenticated buyer for a request.
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BuyerContext {
    buyer_id: BuyerId,
}

impl BuyerContext {
    pub fn new(buyer_id: BuyerId) -> Self {
        Self { buyer_id }
    }

    pub fn buyer_id(&self) -> BuyerId {
        self.buyer_id
    }
}
