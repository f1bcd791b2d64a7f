use super::{read_environment, RecipeOptions};
use crate::output::UserOutput;

pub async fn run_validate(
    recipe: &str,
    content_type: &str,
    options: &RecipeOptions,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    out.status(&format!("Validating {}...", recipe));

    let environment = match read_environment(recipe, content_type, options).await {
        Ok(environment) => environment,
        Err(e) => {
            out.error("Recipe failed to load");
            return Err(e.into());
        }
    };

    environment.validate()?;

    for warning in environment.warnings() {
        out.warning(&warning);
    }

    out.success("Recipe is valid");
    out.blank();

    if let Some(ref version) = environment.version {
        out.status(&format!("Version: {}", version));
    }

    // Show summary
    out.status(&format!("Services: {}", environment.len()));
    for (name, service) in &environment.services {
        let source = if let Some(ref image) = service.image {
            format!("image {}", image)
        } else if let Some(context) = service.build_context() {
            format!("build {}", context)
        } else {
            "unknown".to_string()
        };

        let deps = service.dependency_names()?;
        if deps.is_empty() {
            out.status(&format!("  - {} ({})", name, source));
        } else {
            out.status(&format!(
                "  - {} ({}) after {}",
                name,
                source,
                deps.join(", ")
            ));
        }
    }

    Ok(())
}
