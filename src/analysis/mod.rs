//! Analysis modules.
//!
//! One module per objective, the row subsets they share, the pipeline that
//! runs them in order, and aggregation helpers over the results.

pub mod age_composition;
pub mod aggregator;
pub mod area_contrast;
pub mod gender_gap;
pub mod participation;
pub mod pipeline;
pub mod subsets;
pub mod worker_types;

pub use aggregator::*;
pub use pipeline::Pipeline;
