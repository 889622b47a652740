//! Bot core - normalization and dispatch.

pub mod dispatcher;
pub mod normalize;

pub use dispatcher::{AppState, Dispatcher};
pub use normalize::{MediaKind, NormalizedMessage};
