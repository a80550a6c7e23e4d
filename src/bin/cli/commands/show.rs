use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use tutorly_lib::api::Resource;
use tutorly_lib::notice::Notice;

use super::with_resource;
use crate::app::App;
use crate::render::terminal::{paint, print_notice, Color};
use crate::{OutputFormat, ResourceKind};

pub async fn run(app: &App, kind: ResourceKind, id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    with_resource!(kind, R => show::<R>(app, id, format, use_color).await)
}

async fn show<R: Resource>(app: &App, id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let entity = match app.client::<R>().get(id).await {
        Ok(entity) => entity,
        Err(e) => {
            print_notice(&Notice::from_api_error(&e), use_color);
            return Err(e.into());
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entity)?),
        OutputFormat::Plain => {
            println!("{}", paint(&format!("{} {}", R::LABEL, R::id(&entity)), Color::BOLD, use_color));
            for line in field_lines(&entity)? {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// "key: value" lines for every field but the id, nulls skipped
fn field_lines<T: Serialize>(entity: &T) -> Result<Vec<String>> {
    let Value::Object(fields) = serde_json::to_value(entity)? else {
        return Ok(Vec::new());
    };

    let width = fields.keys().map(String::len).max().unwrap_or(0);
    Ok(fields
        .iter()
        .filter(|(key, value)| key.as_str() != "id" && !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("  {:<width$}  {}", key, value, width = width)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorly_lib::models::{Audit, Status, Unit};

    #[test]
    fn test_field_lines_skip_id_and_nulls() {
        let unit = Unit {
            id: "u1".into(),
            name: "Travel".into(),
            level: "B1".into(),
            description: None,
            status: Status::Inactive,
            audit: Audit::default(),
        };
        let lines = field_lines(&unit).unwrap();
        assert!(lines.iter().any(|l| l.trim_start().starts_with("name") && l.ends_with("Travel")));
        assert!(lines.iter().any(|l| l.ends_with(" 0")));
        assert!(!lines.iter().any(|l| l.contains("description") || l.contains("u1")));
    }
}
