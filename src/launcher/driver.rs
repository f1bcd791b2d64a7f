use super::{Instance, ServiceLauncher};
use crate::config::Environment;
use crate::dependency::{StartPlan, StartStrategy};
use crate::error::{Error, Result};
use crate::recipe::{EnvironmentReader, RecipeDescriptor};
use tokio_util::sync::CancellationToken;

/// How services are handed to the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    /// One service at a time, in start order
    #[default]
    Sequential,
    /// Services of equal weight concurrently, one weight layer after another
    Layered,
}

/// Drives a [`ServiceLauncher`] through an environment.
///
/// The start order is computed before anything is started, so a recipe that
/// cannot be ordered never creates a network. If any service fails to start
/// the network is stopped again and the error is returned; no partial launch
/// is reported as success.
///
/// # Cancellation
///
/// [`EnvironmentLauncher::cancel`] aborts a launch in progress, including a
/// service start the launcher is still working on. The launch then fails
/// with [`Error::Cancelled`] after stopping the network.
pub struct EnvironmentLauncher<L> {
    launcher: L,
    strategy: StartStrategy,
    mode: LaunchMode,
    cancellation_token: CancellationToken,
}

impl<L: ServiceLauncher> EnvironmentLauncher<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            strategy: StartStrategy::new(),
            mode: LaunchMode::default(),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn with_mode(mut self, mode: LaunchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Cancel the launch in progress and every later one.
    pub fn cancel(&self) {
        self.cancellation_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Get a child cancellation token for use in spawned tasks.
    pub fn child_token(&self) -> CancellationToken {
        self.cancellation_token.child_token()
    }

    /// Read a recipe and launch the environment it describes.
    pub async fn launch_recipe(
        &self,
        reader: &EnvironmentReader,
        descriptor: &RecipeDescriptor,
        network: &str,
    ) -> Result<Vec<Instance>> {
        let environment = tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => {
                return Err(Error::Cancelled("recipe download".to_string()));
            }
            environment = reader.read(descriptor) => environment?,
        };

        self.launch(&environment, network).await
    }

    /// Start every service of `environment` in dependency order.
    pub async fn launch(&self, environment: &Environment, network: &str) -> Result<Vec<Instance>> {
        let plan = self.strategy.plan(environment)?;

        if self.cancellation_token.is_cancelled() {
            return Err(Error::Cancelled("launch".to_string()));
        }

        self.launcher.start_network(network).await?;

        let result = match self.mode {
            LaunchMode::Sequential => self.start_sequential(environment, network, &plan).await,
            LaunchMode::Layered => self.start_layered(environment, network, &plan).await,
        };

        if result.is_err() {
            if let Err(e) = self.launcher.stop_network(network).await {
                tracing::warn!("Failed to stop network '{}' after failed launch: {}", network, e);
            }
        }

        result
    }

    async fn start_sequential(
        &self,
        environment: &Environment,
        network: &str,
        plan: &StartPlan,
    ) -> Result<Vec<Instance>> {
        let mut instances = Vec::with_capacity(plan.len());
        for name in plan.order() {
            instances.push(self.start_one(environment, network, name).await?);
        }
        Ok(instances)
    }

    async fn start_layered(
        &self,
        environment: &Environment,
        network: &str,
        plan: &StartPlan,
    ) -> Result<Vec<Instance>> {
        let mut instances = Vec::with_capacity(plan.len());

        for layer in plan.layers() {
            let starts = layer
                .iter()
                .map(|name| self.start_one(environment, network, name));
            let results = futures::future::join_all(starts).await;

            let mut errors = Vec::new();
            for result in results {
                match result {
                    Ok(instance) => instances.push(instance),
                    Err(e) => errors.push(e),
                }
            }

            // If any service failed, return aggregated errors
            if !errors.is_empty() {
                if errors.len() == 1 {
                    return Err(errors.remove(0));
                }
                return Err(Error::Multiple(errors));
            }
        }

        Ok(instances)
    }

    async fn start_one(
        &self,
        environment: &Environment,
        network: &str,
        name: &str,
    ) -> Result<Instance> {
        let service = environment.service(name).ok_or_else(|| {
            Error::ServiceStartFailed(name.to_string(), "not defined in the recipe".to_string())
        })?;

        tracing::info!("Starting service '{}'", name);

        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => {
                Err(Error::Cancelled(format!("start of service '{}'", name)))
            }
            result = self.launcher.start_service(network, name, service) => result,
        }
    }
}
