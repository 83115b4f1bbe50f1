//! # maybe-loaded
//!
//! Query a collection of records the same way whether it is still a lazy
//! relation in its store or has already been loaded into memory.
//!
//! Sometimes an association is preloaded and sometimes it is not. Wrapping
//! it in a [`QueryProxy`] lets the calling code write one query expression:
//! on a lazy relation the recognized operations (`where`, `pluck`,
//! `find_by`, `exists?`, `take`, `find`) are pushed down to the store, on
//! loaded data they are emulated in memory without another round trip.
//!
//! ## Quick Start
//!
//! ```rust
//! use maybe_loaded::{abstract_scope, Held, QueryProxy, Row, StoreRelation, TableStore, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = TableStore::new();
//! store.insert_many("product_warehouses", vec![
//!     Row::new().with("id", 1).with("warehouse_id", 7).with("price_net", 0).with("stock_level", 3),
//!     Row::new().with("id", 2).with("warehouse_id", 7).with("price_net", 12).with("stock_level", 5),
//! ])?;
//!
//! let query = |relation: StoreRelation| {
//!     abstract_scope(Held::Relation(relation), |pw: QueryProxy<StoreRelation>| {
//!         pw.filter([("warehouse_id", 7)])?
//!             .filter("price_net > 0")?
//!             .pluck(["stock_level", "price_net"])?
//!             .take()
//!     })
//! };
//!
//! // Lazy: executed by the store
//! let lazy = query(store.relation("product_warehouses"))?.into_row();
//! // Preloaded: emulated in memory, no further store query
//! let loaded = query(store.relation("product_warehouses").load()?)?.into_row();
//!
//! assert_eq!(lazy, loaded);
//! assert_eq!(
//!     loaded.map(|t| t.values),
//!     Some(vec![Value::Integer(5), Value::Integer(12)])
//! );
//! assert_eq!(store.queries_executed(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Filter specifications
//!
//! - attribute maps: `[("warehouse_id", 3)]`, membership with a list value
//!   `[("warehouse_id", vec![1, 2, 3])]`; all conditions must hold
//! - comparison strings: `"<attribute> <op> <number>"` with `op` one of
//!   `>`, `>=`, `<`, `<=`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Values a proxy can hold
#[allow(missing_docs)]
pub mod held;
pub mod logging;
pub mod mode;
/// The query proxy
pub mod proxy;
pub mod relation;
pub mod scope;
/// In-process table store
#[allow(missing_docs)]
pub mod store;

// Re-export core types
pub use maybe_loaded_core::{
    predicate, Column, Comparison, ComparisonOperator, Condition, Error, FilterSpec, QueryLimits,
    Record, Result, Row, Value,
};

pub use held::Held;
pub use mode::{MaterializedMode, Mode, Queryable, StoreMode};
pub use proxy::{MaterializedProxy, QueryProxy};
pub use relation::{Detached, Relation};
pub use scope::{abstract_scope, abstract_scope_with, ScopeResult};
pub use store::{StoreRelation, TableStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
