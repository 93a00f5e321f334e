use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::reports::score_tier;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a failed command in the appropriate format.
///
/// Client errors keep their error code and redirect target in JSON mode.
pub fn output_error(output_format: &OutputFormat, error: &anyhow::Error) {
    match output_format {
        OutputFormat::Json => {
            let response = match error.downcast_ref::<ClientError>() {
                Some(client_error) => client_error.to_json(),
                None => json!({
                    "success": false,
                    "error": error.to_string(),
                    "error_code": "CLI_ERROR"
                }),
            };
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{}", text),
                Err(_) => println!("{}", response),
            }
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", error);
            if let Some(to) = error.downcast_ref::<ClientError>().and_then(ClientError::redirect_to) {
                eprintln!("Redirect: {}", to);
            }
        }
    }
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a list of records: JSON keyed by `collection_name`, or one
/// rendered line per item
pub fn output_collection<T, F>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    render: F,
) -> anyhow::Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    if items.is_empty() {
        return output_empty_collection(
            output_format,
            collection_name,
            &format!("No {} found", collection_name.replace('_', " ")),
        );
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: items
            }))?);
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", render(item));
            }
            println!("({} total)", items.len());
        }
    }
    Ok(())
}

/// Output a single record: JSON keyed by `item_name`, or labelled lines
pub fn output_record<T: Serialize>(
    output_format: &OutputFormat,
    item_name: &str,
    item: &T,
    lines: &[(&str, String)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                item_name: item
            }))?);
        }
        OutputFormat::Text => {
            let width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            for (label, value) in lines {
                println!("{:width$}  {}", format!("{}:", label), value, width = width + 1);
            }
        }
    }
    Ok(())
}

/// Score with its tier, e.g. `72.5 (high)`
pub fn format_score(score: f64) -> String {
    format!("{:.1} ({})", score, score_tier(score).as_str())
}

pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}
