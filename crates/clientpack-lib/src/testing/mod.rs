//! Test support for clientpack
//!
//! Provides:
//! - A client template fixture in a temporary directory with automatic cleanup
//! - A fake external tool that emulates `npm install` and `npm run build`

pub mod filesystem;
pub mod tools;

pub use filesystem::ClientFixture;
pub use tools::{FakeCall, FakeTool, emit_bundle};
