//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for progress and failure callbacks.

pub mod aliases;

pub use aliases::*;
