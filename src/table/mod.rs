//! The observation table: cells, loading, filtering and overview.

pub mod cell;
pub mod frame;
pub mod loader;
pub mod summary;

pub use frame::{Predicate, Table};
pub use loader::load_table;
pub use summary::DatasetOverview;
