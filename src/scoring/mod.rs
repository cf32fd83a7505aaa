//! Keyword-containment scoring of the service catalog.

pub mod catalog;
pub mod engine;

pub use catalog::{ServiceDef, CATALOG};
pub use engine::{score_services, RankedService, ScoringInput, DEFAULT_TOP_N};
