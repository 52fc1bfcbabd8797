//! Report module - coordinating analysis steps and presenting results

pub mod coordinator;
pub mod display;
pub mod export;

pub use coordinator::*;
pub use display::*;
pub use export::*;
