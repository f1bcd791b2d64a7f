use super::{read_environment, RecipeOptions};
use crate::output::UserOutput;
use compose_plan::{StartPlan, StartStrategy};

pub async fn run_order(
    recipe: &str,
    content_type: &str,
    json: bool,
    layers: bool,
    options: &RecipeOptions,
    out: &dyn UserOutput,
) -> anyhow::Result<()> {
    let environment = read_environment(recipe, content_type, options).await?;
    let plan = StartStrategy::new().plan(&environment)?;

    for line in render_plan(&plan, json, layers)? {
        out.status(&line);
    }

    Ok(())
}

fn render_plan(plan: &StartPlan, json: bool, layers: bool) -> anyhow::Result<Vec<String>> {
    if json {
        let value = if layers {
            serde_json::json!({ "layers": plan.layers() })
        } else {
            serde_json::json!({ "order": plan.order(), "weights": plan.weights() })
        };
        return Ok(vec![serde_json::to_string_pretty(&value)?]);
    }

    if layers {
        return Ok(plan
            .layers()
            .iter()
            .enumerate()
            .map(|(i, layer)| format!("{}: {}", i, layer.join(", ")))
            .collect());
    }

    Ok(plan.order().to_vec())
}
