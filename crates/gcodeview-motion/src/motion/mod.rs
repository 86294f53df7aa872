//! Motion state machine and its sticky context.

pub mod builder;
pub mod context;

pub use builder::ModelBuilder;
pub use context::MotionContext;
