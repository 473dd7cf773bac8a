//! Checkout domain module: order placement and the order ledger.
//!
//! The placement workflow is the one multi-step operation in the system:
//! validate stock, decrement inventory, snapshot prices and write the order
//! ledger inside one atomic unit of work, or apply none of it. This crate
//! holds the pure domain logic plus the storage seams it runs against;
//! concrete stores live in `vendra-infra`.

pub mod address;
pub mod error;
pub mod invoice;
pub mod order;
pub mod placement;
pub mod request;
pub mod store;

pub use address::{Address, NewAddress};
pub use error::PlaceOrderError;
pub use invoice::invoice_code;
pub use order::{NewOrder, NewOrderLine, Order, OrderLine};
pub use placement::{OrderPlacement, PlacedOrder};
pub use request::{LineRequest, PlaceOrderRequest, ValidLine};
pub use store::{LineDetail, OrderDetail, OrderStore, OrderUnit};
