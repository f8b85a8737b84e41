//! Block explorer access.
//!
//! - `client` - the `Explorer` seam used by the sync engine
//! - `wire` - decoding of the explorer's positional JSON rows
//! - `rest` - `HttpExplorer`, the reqwest-backed implementation

pub mod client;
pub mod error;
pub mod rest;
pub mod wire;

pub use client::*;
pub use error::*;
pub use rest::*;
