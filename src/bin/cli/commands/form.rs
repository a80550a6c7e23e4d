use std::io::Read;

use anyhow::{anyhow, bail, Context, Result};
use serde_json::{Map, Value};

use tutorly_lib::api::{Resource, ResourceClient};
use tutorly_lib::form::{FormController, FormOpen, SubmitOutcome};

use super::with_resource;
use crate::app::App;
use crate::render::terminal::{paint, print_notice, Color};
use crate::{OutputFormat, ResourceKind};

/// Read `--json`: a file path, or "-" for stdin
pub fn read_json_arg(arg: &str) -> Result<Value> {
    let raw = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(arg).with_context(|| format!("Failed to read {}", arg))?
    };
    serde_json::from_str(&raw).context("Form is not valid JSON")
}

pub async fn create(app: &App, kind: ResourceKind, body: Value, format: &OutputFormat, use_color: bool) -> Result<()> {
    with_resource!(kind, R => {
        let form: <R as Resource>::Form = serde_json::from_value(body)
            .with_context(|| format!("Not a valid {} form", <R as Resource>::LABEL))?;
        let controller = FormController::<R, _>::create(app.client::<R>(), form);
        submit(controller, format, use_color).await
    })
}

pub async fn edit(
    app: &App,
    kind: ResourceKind,
    id: &str,
    assignments: &[String],
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    with_resource!(kind, R => edit_resource::<R>(app, id, assignments, format, use_color).await)
}

async fn edit_resource<R: Resource>(
    app: &App,
    id: &str,
    assignments: &[String],
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut controller = match FormController::<R, _>::open(app.client::<R>(), Some(id)).await {
        FormOpen::Ready(controller) => controller,
        FormOpen::Redirect { to, notice } => {
            print_notice(&notice, use_color);
            bail!("Could not open {} {} (back to {})", R::LABEL, id, to);
        }
    };

    let mut fields = match serde_json::to_value(controller.form())? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    for assignment in assignments {
        apply_assignment(&mut fields, assignment)?;
    }
    let form: R::Form = serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("Not a valid {} form", R::LABEL))?;
    controller.set_form(form);

    submit(controller, format, use_color).await
}

/// Apply `field=value` to a form's JSON. A field that currently holds a
/// string keeps the raw text; other fields take the value as JSON when it
/// parses, falling back to a string.
fn apply_assignment(fields: &mut Map<String, Value>, assignment: &str) -> Result<()> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected field=value, got '{}'", assignment))?;
    let key = key.trim();
    if key.is_empty() {
        bail!("Missing field name in '{}'", assignment);
    }

    let value = match fields.get(key) {
        Some(Value::String(_)) => Value::String(raw.to_string()),
        _ => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
    };
    fields.insert(key.to_string(), value);
    Ok(())
}

async fn submit<R: Resource>(
    mut controller: FormController<R, ResourceClient<R>>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    match controller.submit().await {
        SubmitOutcome::Saved { entity, notice, redirect } => {
            print_notice(&notice, use_color);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entity)?),
                OutputFormat::Plain => {
                    println!("{}", paint(&format!("{} -> {}", R::id(&entity), redirect), Color::DIM, use_color))
                }
            }
            Ok(())
        }
        SubmitOutcome::Invalid { errors, notice } => {
            print_notice(&notice, use_color);
            for error in &errors {
                eprintln!("  {}", error);
            }
            bail!("{} form has {} invalid field(s)", R::LABEL, errors.len())
        }
        SubmitOutcome::Failed { notice } => {
            print_notice(&notice, use_color);
            bail!("Saving {} failed", R::LABEL)
        }
    }
}
