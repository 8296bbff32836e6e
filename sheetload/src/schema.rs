//! Schema resolution: mapping file × header row → [`ResolvedSchema`].
//!
//! Resolution runs once per sheet, before any data row is read, and fails
//! fast: a missing name mapping or a mapped column absent from the header
//! ends the whole run as a [`ConfigError`].
//!
//! Resolution rules:
//!
//! - The name column is required. It resolves with type string and the drop
//!   policy, so a row without a name is always discarded.
//! - The class column is optional. It resolves with type string and the
//!   ignore policy, so a row without a class gets an empty class label.
//! - Every other non-empty header cell becomes a content field in header
//!   column order, defaulting to a string with the ignore policy. Cells
//!   whose text is claimed by the name/class mapping are not content
//!   fields. Duplicate header texts each keep their own column index.
//! - Per-column overrides from the mapping's `columns` table apply to
//!   content fields only; fill values are converted to the declared type
//!   here, so row extraction never sees an untyped fill.

use crate::config::{ColumnSpec, RawConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::extract::convert::convert_fill_value;
use crate::models::{CellValue, FieldDescriptor, NullPolicy, ResolvedSchema, ValueType};

/// Resolve a raw mapping against a sheet's header row.
pub fn resolve_schema(config: &RawConfig, header: &[CellValue]) -> ConfigResult<ResolvedSchema> {
    let header_texts: Vec<String> = header.iter().map(CellValue::display_text).collect();

    let name_column = config
        .name_column
        .as_deref()
        .ok_or(ConfigError::MissingRequiredField("name-column"))?;
    let name_index = find_column(&header_texts, name_column, config.header_row)?;
    let name = FieldDescriptor::new(name_column, name_index).with_policy(NullPolicy::Drop);

    let class = match config.class_column.as_deref() {
        Some(class_column) => {
            let class_index = find_column(&header_texts, class_column, config.header_row)?;
            Some(FieldDescriptor::new(class_column, class_index).with_policy(NullPolicy::Ignore))
        }
        None => None,
    };

    let mut content = Vec::new();
    for (index, text) in header_texts.iter().enumerate() {
        if text.is_empty() || claimed(text, &name, class.as_ref()) {
            continue;
        }
        content.push(content_descriptor(text, index, config.columns.get(text))?);
    }

    Ok(ResolvedSchema {
        header_row: config.header_row,
        name,
        class,
        content,
    })
}

/// First header index whose text equals `column`.
fn find_column(header_texts: &[String], column: &str, header_row: usize) -> ConfigResult<usize> {
    header_texts
        .iter()
        .position(|text| text == column)
        .ok_or_else(|| ConfigError::ColumnNotFound {
            column: column.to_string(),
            header_row,
        })
}

/// Whether a header cell is already claimed by the name/class mapping.
fn claimed(text: &str, name: &FieldDescriptor, class: Option<&FieldDescriptor>) -> bool {
    text == name.column || class.is_some_and(|c| text == c.column)
}

/// Build one content descriptor, applying any per-column overrides.
fn content_descriptor(
    column: &str,
    index: usize,
    spec: Option<&ColumnSpec>,
) -> ConfigResult<FieldDescriptor> {
    let mut field = FieldDescriptor::new(column, index);

    let Some(spec) = spec else {
        return Ok(field);
    };

    if let Some(type_name) = spec.value_type.as_deref() {
        field.value_type = ValueType::parse(type_name)
            .ok_or_else(|| ConfigError::UnknownValueType(type_name.to_string()))?;
    }
    if let Some(policy_name) = spec.null_policy.as_deref() {
        field.null_policy = NullPolicy::parse(policy_name);
    }
    if field.null_policy == NullPolicy::Fill {
        let raw = spec
            .fill_value
            .as_ref()
            .ok_or_else(|| ConfigError::MissingFillValue(column.to_string()))?;
        let converted = convert_fill_value(raw, field.value_type).map_err(|_| {
            ConfigError::InvalidFillValue {
                column: column.to_string(),
                value: raw.to_string(),
                value_type: field.value_type,
            }
        })?;
        field.fill_value = Some(converted);
    }

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSpec;
    use serde_json::json;

    fn header(texts: &[&str]) -> Vec<CellValue> {
        texts
            .iter()
            .map(|t| {
                if t.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text((*t).to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_resolve_basic_schema() {
        let config = RawConfig::new("name").with_class("class");
        let schema =
            resolve_schema(&config, &header(&["id", "name", "class", "score"])).unwrap();

        assert_eq!(schema.header_row, 0);
        assert_eq!(schema.name.index, 1);
        assert_eq!(schema.name.value_type, ValueType::String);
        assert_eq!(schema.name.null_policy, NullPolicy::Drop);

        let class = schema.class.unwrap();
        assert_eq!(class.index, 2);
        assert_eq!(class.null_policy, NullPolicy::Ignore);

        let columns: Vec<&str> = schema.content.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["id", "score"]);
        assert_eq!(schema.content[0].index, 0);
        assert_eq!(schema.content[1].index, 3);
    }

    #[test]
    fn test_missing_name_column_key() {
        let config = RawConfig {
            name_column: None,
            ..RawConfig::new("unused")
        };
        match resolve_schema(&config, &header(&["a", "b"])) {
            Err(ConfigError::MissingRequiredField(key)) => assert_eq!(key, "name-column"),
            other => panic!("expected MissingRequiredField, got {other:?}"),
        }
    }

    #[test]
    fn test_name_not_in_header() {
        let config = RawConfig::new("hostname");
        match resolve_schema(&config, &header(&["a", "b"])) {
            Err(ConfigError::ColumnNotFound { column, header_row }) => {
                assert_eq!(column, "hostname");
                assert_eq!(header_row, 0);
            }
            other => panic!("expected ColumnNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_class_not_in_header() {
        let config = RawConfig::new("name").with_class("env");
        assert!(matches!(
            resolve_schema(&config, &header(&["name", "a"])),
            Err(ConfigError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_empty_header_cells_skipped() {
        let config = RawConfig::new("name");
        let schema = resolve_schema(&config, &header(&["a", "", "name", "b"])).unwrap();
        let columns: Vec<&str> = schema.content.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["a", "b"]);
    }

    #[test]
    fn test_duplicate_headers_keep_their_indexes() {
        let config = RawConfig::new("name");
        let schema = resolve_schema(&config, &header(&["name", "tag", "tag"])).unwrap();
        assert_eq!(schema.name.index, 0);
        assert_eq!(schema.content.len(), 2);
        assert_eq!(schema.content[0].index, 1);
        assert_eq!(schema.content[1].index, 2);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let config = RawConfig::new("name").with_class("class").with_column(
            "score",
            ColumnSpec {
                value_type: Some("integer".into()),
                null_policy: Some("fill".into()),
                fill_value: Some(json!("0")),
            },
        );
        let cells = header(&["id", "name", "class", "score"]);
        let first = resolve_schema(&config, &cells).unwrap();
        let second = resolve_schema(&config, &cells).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_column_overrides_apply() {
        let config = RawConfig::new("name").with_column(
            "score",
            ColumnSpec {
                value_type: Some("integer".into()),
                null_policy: Some("fill".into()),
                fill_value: Some(json!("0")),
            },
        );
        let schema = resolve_schema(&config, &header(&["name", "score"])).unwrap();
        let score = &schema.content[0];
        assert_eq!(score.value_type, ValueType::Integer);
        assert_eq!(score.null_policy, NullPolicy::Fill);
        assert_eq!(score.fill_value, Some(json!(0)));
    }

    #[test]
    fn test_unknown_policy_degrades_to_drop() {
        let config = RawConfig::new("name").with_column(
            "tag",
            ColumnSpec {
                null_policy: Some("explode".into()),
                ..ColumnSpec::default()
            },
        );
        let schema = resolve_schema(&config, &header(&["name", "tag"])).unwrap();
        assert_eq!(schema.content[0].null_policy, NullPolicy::Drop);
    }

    #[test]
    fn test_unknown_value_type_rejected() {
        let config = RawConfig::new("name").with_column(
            "tag",
            ColumnSpec {
                value_type: Some("decimal".into()),
                ..ColumnSpec::default()
            },
        );
        assert!(matches!(
            resolve_schema(&config, &header(&["name", "tag"])),
            Err(ConfigError::UnknownValueType(_))
        ));
    }

    #[test]
    fn test_fill_without_value_rejected() {
        let config = RawConfig::new("name").with_column(
            "tag",
            ColumnSpec {
                null_policy: Some("fill".into()),
                ..ColumnSpec::default()
            },
        );
        assert!(matches!(
            resolve_schema(&config, &header(&["name", "tag"])),
            Err(ConfigError::MissingFillValue(_))
        ));
    }

    #[test]
    fn test_unconvertible_fill_value_rejected() {
        let config = RawConfig::new("name").with_column(
            "score",
            ColumnSpec {
                value_type: Some("integer".into()),
                null_policy: Some("fill".into()),
                fill_value: Some(json!("n/a")),
            },
        );
        assert!(matches!(
            resolve_schema(&config, &header(&["name", "score"])),
            Err(ConfigError::InvalidFillValue { .. })
        ));
    }

    #[test]
    fn test_numeric_header_cells_become_content() {
        let config = RawConfig::new("name");
        let cells = vec![
            CellValue::Text("name".into()),
            CellValue::Number(2024.0),
            CellValue::Empty,
        ];
        let schema = resolve_schema(&config, &cells).unwrap();
        assert_eq!(schema.content.len(), 1);
        assert_eq!(schema.content[0].column, "2024");
    }
}
