//! # Compose Plan
//!
//! Turns a compose-style environment recipe into a validated model and the
//! order in which its services have to be started.
//!
//! ## Pipeline
//!
//! - **Recipe loading**: inline content, or a download in which the caller's
//!   token is only ever sent to the trusted API host
//! - **Parsing**: YAML recipes into an [`Environment`], with explicit defaults
//!   for every optional collection
//! - **Start ordering**: services ranked by the depth of their `depends_on`
//!   and `links` dependencies; cycles and undefined references are reported
//!   instead of producing a partial order
//! - **Launching**: a [`ServiceLauncher`] implementation receives services in
//!   that order
//!
//! ## Quick Start
//!
//! ```no_run
//! use compose_plan::{LoaderSettings, EnvironmentReader, RecipeDescriptor, StartStrategy};
//!
//! # async fn example() -> Result<(), compose_plan::Error> {
//! let reader = EnvironmentReader::new(&LoaderSettings::default())?;
//! let descriptor = RecipeDescriptor::inline(
//!     "services:\n  db:\n    image: postgres\n  web:\n    image: nginx\n    links: [db]\n",
//!     "application/x-yaml",
//! );
//!
//! let environment = reader.read(&descriptor).await?;
//! let order = StartStrategy::new().order(&environment)?;
//! assert_eq!(order, vec!["db", "web"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dependency;
pub mod error;
pub mod launcher;
pub mod recipe;

// Re-export commonly used types
pub use config::{Environment, LoaderSettings, Parser, Service};
pub use dependency::{Graph, StartPlan, StartStrategy};
pub use error::{Error, Result};
pub use launcher::{EnvironmentLauncher, Instance, LaunchMode, ServiceLauncher};
pub use recipe::{EnvironmentContext, EnvironmentReader, RecipeDescriptor, RecipeLoader, Subject};
