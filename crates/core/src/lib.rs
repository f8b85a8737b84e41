//! Core data types for the whale alert bot.

pub mod alert;
pub mod block;
pub mod tier;

pub use alert::*;
pub use block::*;
pub use tier::*;
