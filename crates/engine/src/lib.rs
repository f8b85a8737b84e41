//! Block sync and alert classification engine.

pub mod classifier;
pub mod sync;
pub mod tracker;
pub mod wallets;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::*;
pub use sync::*;
pub use tracker::*;
pub use wallets::*;
