//! Common utilities shared by the Arbor crates.
//!
//! - **Warning System** - deduplicated, coloured terminal notices for
//!   features the tree builder recognises but does not fully support

pub mod warning;
