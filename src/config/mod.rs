//! Recipe model and parsing.
//!
//! - `types` - Root recipe structure (`Environment`)
//! - `service` - Service definition (`Service`, `Build`)
//! - `link` - `service:alias` link entries (`Link`)
//! - `parser` - Content-type dispatch and YAML parsing (`Parser`)
//! - `validation` - Recipe validation
//! - `settings` - Recipe loader settings (`LoaderSettings`)
//! - `duration` - Duration strings used by the settings

mod duration;
mod link;
mod parser;
mod service;
mod settings;
mod types;
mod validation;

pub use duration::*;
pub use link::*;
pub use parser::*;
pub use service::{Build, Service};
pub use settings::*;
pub use types::*;
