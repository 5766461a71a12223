//! Running instances of a model.
//!
//! An [`Instance`] borrows a [`Model`](crate::model::Model) and keeps only its
//! own active configuration, so many instances can share one model.

mod builder;
mod engine;
mod error;
mod instance;
mod random;

pub use builder::InstanceBuilder;
pub use error::EvaluationError;
pub use instance::Instance;
pub use random::{Random, SeededRandom, ThreadRandom};
