//! Recipe acquisition.
//!
//! A [`RecipeDescriptor`] names a recipe by inline content or by location.
//! The [`RecipeLoader`] turns it into text and the [`EnvironmentReader`]
//! combines loading with parsing into an [`Environment`].

mod context;
mod descriptor;
mod loader;

pub use context::*;
pub use descriptor::*;
pub use loader::*;

use crate::config::{ContentType, Environment, LoaderSettings, Parser};
use crate::error::Result;

/// Loads and parses recipes.
#[derive(Debug, Clone)]
pub struct EnvironmentReader {
    loader: RecipeLoader,
}

impl EnvironmentReader {
    pub fn new(settings: &LoaderSettings) -> Result<Self> {
        Ok(Self {
            loader: RecipeLoader::new(settings)?,
        })
    }

    pub fn with_loader(loader: RecipeLoader) -> Self {
        Self { loader }
    }

    /// Read the environment described by `descriptor`.
    ///
    /// The content type is checked before anything is downloaded.
    pub async fn read(&self, descriptor: &RecipeDescriptor) -> Result<Environment> {
        ContentType::from_media_type(&descriptor.content_type)?;

        let content = self.loader.load(descriptor).await?;
        Parser::new().parse_recipe(&content, &descriptor.content_type)
    }

    pub fn loader(&self) -> &RecipeLoader {
        &self.loader
    }
}
