//! Pipeline module - the credit-history analyzers

pub mod analyzer;
pub mod buckets;
pub mod correlation;
pub mod error;
pub mod loader;
pub mod registry;
pub mod structure;
pub mod target;
pub mod values;

pub use analyzer::*;
pub use buckets::*;
pub use correlation::*;
pub use error::EdaError;
pub use loader::*;
pub use registry::*;
pub use structure::*;
pub use target::*;
