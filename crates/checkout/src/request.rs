use serde::Deserialize;

use vendra_core::ProductId;

use crate::error::PlaceOrderError;

/// One requested (product, quantity) pair, as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// The order-placement request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub payment_method: String,
    pub shipping_address_id: i64,
    pub lines: Vec<LineRequest>,
}

/// A line that passed shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidLine {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl PlaceOrderRequest {
    /// Shape validation.
    ///
    /// Lines are checked in submission order and the first offending line is
    /// reported; nothing has been persisted at this point.
    pub fn validate(&self) -> Result<Vec<ValidLine>, PlaceOrderError> {
        if self.lines.is_empty() {
            return Err(PlaceOrderError::invalid_input("no products selected"));
        }

        let mut lines = Vec::with_capacity(self.lines.len());
        for (idx, line) in self.lines.iter().enumerate() {
            if line.product_id <= 0 {
                return Err(PlaceOrderError::invalid_input(format!(
                    "line {}: invalid product id",
                    idx + 1
                )));
            }
            if line.quantity <= 0 {
                return Err(PlaceOrderError::invalid_input(format!(
                    "line {}: quantity must be positive",
                    idx + 1
                )));
            }
            lines.push(ValidLine {
                product_id: ProductId::new(line.product_id),
                quantity: line.quantity,
            });
        }

        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(lines: Vec<(i64, i64)>) -> PlaceOrderRequest {
        PlaceOrderRequest {
            payment_method: "transfer".to_string(),
            shipping_address_id: 1,
            lines: lines
                .into_iter()
                .map(|(product_id, quantity)| LineRequest {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_line_list_is_rejected() {
        let err = request(vec![]).validate().unwrap_err();
        match err {
            PlaceOrderError::InvalidInput(msg) => assert!(msg.contains("no products")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn zero_product_id_is_rejected() {
        let err = request(vec![(0, 2)]).validate().unwrap_err();
        assert!(matches!(err, PlaceOrderError::InvalidInput(_)));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for quantity in [0, -3] {
            let err = request(vec![(1, quantity)]).validate().unwrap_err();
            assert!(matches!(err, PlaceOrderError::InvalidInput(_)));
        }
    }

    #[test]
    fn first_offending_line_is_the_one_reported() {
        let err = request(vec![(1, 2), (0, 1), (-5, 1)]).validate().unwrap_err();
        match err {
            PlaceOrderError::InvalidInput(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_lines_come_back_typed_in_submission_order() {
        let lines = request(vec![(3, 2), (1, 7)]).validate().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, ProductId::new(3));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].product_id, ProductId::new(1));
    }

    proptest! {
        #[test]
        fn validation_accepts_exactly_the_well_formed_requests(
            lines in proptest::collection::vec((-5i64..50, -5i64..50), 0..8)
        ) {
            let well_formed =
                !lines.is_empty() && lines.iter().all(|(p, q)| *p > 0 && *q > 0);
            prop_assert_eq!(request(lines).validate().is_ok(), well_formed);
        }
    }
}
