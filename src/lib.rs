//! Datasystems: Hierarchy-Validated Filesystem Metadata Index
//!
//! A data system is a root directory whose contents follow a declared
//! hierarchy of level names (for example `domain / project / dataset`).
//! Entries record a path under the root together with a free-form schema,
//! and are persisted in an index document inside the root.
//!
//! ```no_run
//! use datasystems::{filters, DataSystem, NameArg, Schema};
//!
//! # fn main() -> datasystems::Result<()> {
//! let mut system = DataSystem::create("/srv/data", ["domain", "project"])?;
//! let path = system.name(&[NameArg::from("Acme"), NameArg::named("project", "Widgets")])?;
//! system.add(&path, Schema::new())?;
//! for entry in system.iter_filter(&filters([("domain", "acme")])) {
//!     println!("{}", entry.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hierarchy;
pub mod inference;
pub mod logging;
pub mod naming;
pub mod query;
pub mod store;
pub mod system;
pub mod tree;
pub mod types;

pub use crate::config::{ConfigLoader, DataSystemsConfig};
pub use error::{DataSystemError, Result, SchemaError};
pub use hierarchy::{sanitize, Hierarchy};
pub use inference::{InferenceReport, SchemaProvider, SkippedPath};
pub use naming::{NameArg, Namer};
pub use store::{IndexDocument, IndexStorage, JsonFileStorage};
pub use system::DataSystem;
pub use tree::{Entry, Node, Structure};
pub use types::{filters, Filters, Schema};
