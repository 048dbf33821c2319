//! Client asset bundle management
//!
//! - [`store`]: transactional record of aliased JS dependencies
//! - [`discovery`]: contributor registry with per-contributor failure isolation
//! - [`builds`]: staged rebuild and restore of the output tree
//! - [`artifacts`]: read-only lookups against the published bundle

pub mod alias;
pub mod artifacts;
pub mod builds;
pub mod discovery;
pub mod exports;
pub mod fsutil;
pub mod layout;
pub mod manifest;
pub mod store;
pub mod tools;

pub use artifacts::{BuildArtifacts, InvalidPathError};
pub use builds::{BuildError, BuildOrchestrator, BuildReport};
pub use discovery::{
    Contributor, ContributorRegistry, Discovery, DiscoveryError, ManifestContributor,
    StaticContributor,
};
pub use exports::find_js_module_exports;
pub use layout::ClientLayout;
pub use manifest::{InstallListLocation, ManifestError};
pub use store::{
    BuildConfig, ConfigStore, ConfigValidationError, DependencyEntry, StoreError, Transaction,
    TransactionState,
};
pub use tools::{ExternalTool, NpmTool, ToolStep};
