//! Operation handlers.
//!
//! - [`checkpoint`]: bounded retry loop consuming retry signals addressed to it

pub mod checkpoint;

pub use checkpoint::{checkpoint, checkpoint_default, AttemptOutcome};
