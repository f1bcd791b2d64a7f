//! Contract between start ordering and the component that runs containers.
//!
//! This crate never starts containers itself. A [`ServiceLauncher`]
//! implementation does, and [`EnvironmentLauncher`] drives it through a
//! whole environment in dependency order.

mod driver;

pub use driver::*;

use crate::config::Service;
use crate::error::Result;
use async_trait::async_trait;

/// Handle of a started service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Service name as used in the recipe
    pub service: String,
    /// Launcher-specific identifier, e.g. a container ID
    pub id: String,
}

impl Instance {
    pub fn new(service: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            id: id.into(),
        }
    }
}

/// Starts the services of an environment.
///
/// Calls arrive in start order: `start_network` once, then `start_service`
/// for each service after all of its dependencies have started, and
/// `stop_network` if the launch is abandoned.
#[async_trait]
pub trait ServiceLauncher: Send + Sync {
    /// Create the network the environment's services join.
    async fn start_network(&self, network: &str) -> Result<()>;

    /// Start one service and return once it is running.
    async fn start_service(&self, network: &str, name: &str, service: &Service)
        -> Result<Instance>;

    /// Remove the environment's network.
    async fn stop_network(&self, network: &str) -> Result<()>;
}
