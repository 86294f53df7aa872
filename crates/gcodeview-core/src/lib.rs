//! # GCodeView Core
//!
//! Core types shared by the GCodeView crates:
//! - Geometry primitives (`Vec3`, `Bounds3`, `ValueRange`)
//! - Error types for reconstruction, configuration and I/O
//! - Cooperative progress reporting and cancellation (`Tracer`)
//! - Feed rate unit conversion

pub mod error;
pub mod geometry;
pub mod progress;
pub mod types;
pub mod units;

pub use error::{Error, GcodeError, Result};
pub use geometry::{Bounds3, ValueRange, Vec3};
pub use progress::{CallbackTracer, CancelToken, NullTracer, Tracer};
pub use types::{FailureCallback, ProgressCallback};
pub use units::{convert_feed_rate, FeedRateUnits};
