//! Concrete storage backends for the catalog and checkout seams.
//!
//! Two implementations, behaviourally equivalent: `InMemoryStore` for tests
//! and local development, `PgStore` for production. Both back the same pair
//! of traits (`CatalogStore`, `OrderStore`), so the rest of the system never
//! knows which one it is talking to.

pub mod store;


pub use store::{InMemoryStore, PgStore};
