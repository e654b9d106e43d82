/*
[INPUT]:  `data` payloads delivered by the message socket
[OUTPUT]: One printable line per payload with numbers locale-formatted
[POS]:    Presentation layer - stdout rendering
[UPDATE]: When changing the output line format
*/

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;
use tickwire_adapter::{FormatOptions, NumberFormatter};

const MISSING: &str = "-";

/// Renders payloads as `field=value` pairs (or the raw JSON when no fields
/// are configured).
#[derive(Debug, Clone, Default)]
pub struct PayloadRenderer {
    formatter: NumberFormatter,
    options: FormatOptions,
    fields: Vec<String>,
}

impl PayloadRenderer {
    pub fn new(fields: Vec<String>, options: FormatOptions) -> Self {
        Self {
            formatter: NumberFormatter::new(),
            options,
            fields,
        }
    }

    pub fn render(&self, data: &Value) -> String {
        match data {
            Value::Number(_) => self.render_value(data),
            Value::Object(object) if !self.fields.is_empty() => self
                .fields
                .iter()
                .map(|field| {
                    let value = object
                        .get(field)
                        .map(|value| self.render_value(value))
                        .unwrap_or_else(|| MISSING.to_string());
                    format!("{field}={value}")
                })
                .collect::<Vec<_>>()
                .join(" "),
            _ => data.to_string(),
        }
    }

    fn render_value(&self, value: &Value) -> String {
        match value {
            Value::Number(number) => match Decimal::from_str(&number.to_string()) {
                Ok(exact) => self.formatter.format_decimal(exact, &self.options),
                Err(_) => number
                    .as_f64()
                    .map(|float| self.formatter.format(float, &self.options))
                    .unwrap_or_else(|| number.to_string()),
            },
            // Feeds commonly quote prices as strings to keep precision
            Value::String(text) => match Decimal::from_str(text) {
                Ok(exact) => self.formatter.format_decimal(exact, &self.options),
                Err(_) => text.clone(),
            },
            Value::Null => MISSING.to_string(),
            other => other.to_string(),
        }
    }
}
