mod order;
mod validate;

pub use order::run_order;
pub use validate::run_validate;

use compose_plan::{
    Environment, EnvironmentContext, EnvironmentReader, Error, LoaderSettings, RecipeDescriptor,
    Subject,
};

/// Where to find a recipe and how to authenticate for it.
pub struct RecipeOptions {
    pub settings: LoaderSettings,
    pub token: Option<String>,
}

/// Describe the recipe named on the command line.
///
/// URLs are left to the loader; anything else is read as a local file and
/// passed inline.
pub fn describe_recipe(recipe: &str, content_type: &str) -> compose_plan::Result<RecipeDescriptor> {
    if recipe.starts_with("http://") || recipe.starts_with("https://") {
        return Ok(RecipeDescriptor::remote(recipe, content_type));
    }

    let content = std::fs::read_to_string(recipe)
        .map_err(|e| Error::Config(format!("Failed to read recipe file '{}': {}", recipe, e)))?;
    Ok(RecipeDescriptor::inline(content, content_type))
}

/// Load and parse a recipe on behalf of the caller's token.
pub async fn read_environment(
    recipe: &str,
    content_type: &str,
    options: &RecipeOptions,
) -> compose_plan::Result<Environment> {
    let descriptor = describe_recipe(recipe, content_type)?;
    let reader = EnvironmentReader::new(&options.settings)?;

    let subject = match options.token {
        Some(ref token) => Subject::with_token(token.clone()),
        None => Subject::anonymous(),
    };

    EnvironmentContext::scope(subject, reader.read(&descriptor)).await
}
