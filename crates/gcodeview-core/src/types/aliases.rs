//! Type aliases for commonly used callback types.
//!
//! Boxed closures appear at every seam where a host application plugs into a
//! long-running reconstruction. Naming them keeps signatures readable and the
//! bounds consistent across crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use gcodeview_core::types::*;
//!
//! let on_progress: ProgressCallback = Box::new(|fraction| println!("{:.0}%", fraction * 100.0));
//! ```

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// A progress callback receiving the completed fraction in `[0, 1]`.
///
/// Invoked once per processed layer.
pub type ProgressCallback = Box<dyn FnMut(f32) + Send>;

/// A callback receiving a failure message.
///
/// Invoked once when a reconstruction is abandoned.
pub type FailureCallback = Box<dyn FnMut(&str) + Send>;
