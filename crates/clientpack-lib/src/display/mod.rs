//! Terminal display system
//!
//! Semantic APIs for user-facing communication. Logging goes through tracing;
//! status lines and spinners go through a [`DisplayProvider`] so command logic
//! can be tested against [`MockDisplayProvider`].

pub mod live;
pub mod mock;
pub mod providers;
pub mod styling;

pub use live::LiveDisplayProvider;
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{DisplayProvider, ProgressProvider, ProgressTracker, StatusProvider};
pub use styling::StyleManager;
