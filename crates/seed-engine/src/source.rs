//! Record source: one YAML data file in, a one-shot stream of records out.
//!
//! Two document shapes are accepted:
//!
//! ```yaml
//! # sequence: used as-is, file order preserved
//! - name: HQ
//!   status: active
//!
//! # mapping: each key becomes the value of the loader's key field
//! HQ:
//!   status: active
//! ```
//!
//! An empty document is an empty sequence. Anything else is
//! [`LoadError::InvalidFormat`].

use std::path::Path;

use serde_json::{Number, Value};
use serde_yaml::Value as Yaml;

use seed_core::{FieldValue, Record, record_from_json};

use crate::error::LoadError;

/// Lazily converts the entries of one parsed document into records.
///
/// Consumed by value: a source is read once per load.
pub struct RecordSource {
    file: String,
    primary_field: String,
    entries: Entries,
    index: usize,
}

enum Entries {
    Sequence(std::vec::IntoIter<Yaml>),
    Mapping(serde_yaml::mapping::IntoIter),
}

impl RecordSource {
    /// Read and parse `path`.
    ///
    /// `primary_field` is the loader's key field; it receives the key
    /// of each entry when the document is a mapping.
    ///
    /// # Errors
    ///
    /// - `LoadError::MissingFile` if `path` does not exist (callers treat this
    ///   as "nothing to load").
    /// - `LoadError::Io`, `LoadError::Parse`, `LoadError::InvalidFormat` otherwise.
    pub fn open(path: &Path, primary_field: &str) -> Result<Self, LoadError> {
        if !path.is_file() {
            return Err(LoadError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::parse(&text, &file, primary_field)
    }

    /// Parse an in-memory document. `file` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// `LoadError::Parse` or `LoadError::InvalidFormat`.
    pub fn parse(text: &str, file: &str, primary_field: &str) -> Result<Self, LoadError> {
        let document: Yaml = if text.trim().is_empty() {
            Yaml::Null
        } else {
            serde_yaml::from_str(text).map_err(|source| LoadError::Parse {
                file: file.to_string(),
                source,
            })?
        };

        let entries = match untag(document) {
            Yaml::Null => Entries::Sequence(Vec::new().into_iter()),
            Yaml::Sequence(items) => Entries::Sequence(items.into_iter()),
            Yaml::Mapping(map) => Entries::Mapping(map.into_iter()),
            other => {
                return Err(LoadError::InvalidFormat {
                    file: file.to_string(),
                    found: yaml_type_name(&other),
                });
            }
        };

        Ok(Self {
            file: file.to_string(),
            primary_field: primary_field.to_string(),
            entries,
            index: 0,
        })
    }

    /// File name used in diagnostics.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    fn invalid(&self, reason: impl Into<String>) -> LoadError {
        LoadError::InvalidRecord {
            file: self.file.clone(),
            index: self.index,
            reason: reason.into(),
        }
    }

    fn convert(&self, value: Yaml) -> Result<Record, LoadError> {
        let value = yaml_to_json(value).map_err(|reason| self.invalid(reason))?;
        record_from_json(value).map_err(|e| self.invalid(e.to_string()))
    }

    fn keyed(&self, key: Yaml, value: Yaml) -> Result<Record, LoadError> {
        let key = match untag(key) {
            key @ (Yaml::String(_) | Yaml::Number(_) | Yaml::Bool(_)) => {
                yaml_to_json(key).map_err(|reason| self.invalid(reason))?
            }
            _ => return Err(self.invalid("mapping keys must be scalars")),
        };
        let mut record = self.convert(value)?;
        record.shift_remove(&self.primary_field);
        record.shift_insert(0, self.primary_field.clone(), FieldValue::Value(key));
        Ok(record)
    }
}

impl Iterator for RecordSource {
    type Item = Result<Record, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = match &mut self.entries {
            Entries::Sequence(items) => {
                let value = items.next()?;
                self.convert(value)
            }
            Entries::Mapping(entries) => {
                let (key, value) = entries.next()?;
                self.keyed(key, value)
            }
        };
        self.index += 1;
        Some(item)
    }
}

fn untag(value: Yaml) -> Yaml {
    match value {
        Yaml::Tagged(tagged) => untag(tagged.value),
        other => other,
    }
}

/// Convert YAML to JSON, rendering non-string mapping keys as text.
///
/// # Errors
///
/// Returns the reason if the value holds a number JSON cannot represent
/// (`.nan`, `.inf`).
pub fn yaml_to_json(value: Yaml) -> Result<Value, String> {
    Ok(match untag(value) {
        Yaml::Null | Yaml::Tagged(_) => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| format!("{n} is not a finite number"))?
            }
        }
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| Ok((key_text(k)?, yaml_to_json(v)?)))
                .collect::<Result<_, String>>()?,
        ),
    })
}

fn key_text(key: Yaml) -> Result<String, String> {
    Ok(match yaml_to_json(key)? {
        Value::String(s) => s,
        other => other.to_string(),
    })
}

const fn yaml_type_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records(text: &str) -> Vec<Record> {
        RecordSource::parse(text, "test.yml", "name")
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    fn record(value: serde_json::Value) -> Record {
        record_from_json(value).unwrap()
    }

    #[test]
    fn mapping_key_becomes_primary_field() {
        let out = records("site-a:\n  status: active\n");
        assert_eq!(out, vec![record(json!({"name": "site-a", "status": "active"}))]);
        let keys: Vec<&str> = out[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "status"]);
    }

    #[test]
    fn mapping_key_overrides_inline_primary_field() {
        let out = records("site-a:\n  name: other\n  status: active\n");
        assert_eq!(out[0].get("name"), Some(&FieldValue::from("site-a")));
    }

    #[test]
    fn mapping_preserves_key_order() {
        let out = records("b: {}\na: {}\nc:\n");
        let names: Vec<String> = out.iter().map(|r| r["name"].to_string()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn numeric_mapping_key_stays_numeric() {
        let source = RecordSource::parse("100:\n  name: users\n", "vlans.yml", "vid").unwrap();
        let out: Vec<Record> = source.collect::<Result<_, _>>().unwrap();
        assert_eq!(out[0].get("vid"), Some(&FieldValue::Value(json!(100))));
    }

    #[test]
    fn sequence_is_used_as_is() {
        let out = records("- name: one\n- name: two\n  slug: two\n");
        assert_eq!(
            out,
            vec![
                record(json!({"name": "one"})),
                record(json!({"name": "two", "slug": "two"})),
            ]
        );
    }

    #[test]
    fn empty_document_is_empty() {
        assert!(records("").is_empty());
        assert!(records("---\n").is_empty());
    }

    #[test]
    fn scalar_document_is_invalid_format() {
        let err = RecordSource::parse("just a string", "sites.yml", "name").err().unwrap();
        assert!(matches!(
            err,
            LoadError::InvalidFormat { ref file, found: "string" } if file == "sites.yml"
        ));
    }

    #[test]
    fn non_mapping_entry_is_invalid_record() {
        let mut source = RecordSource::parse("- name: ok\n- 42\n", "sites.yml", "name").unwrap();
        assert!(source.next().unwrap().is_ok());
        let err = source.next().unwrap().unwrap_err();
        assert!(matches!(err, LoadError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn non_finite_number_is_invalid_record() {
        let text = "- name: ok\n- name: bad\n  weight: .nan\n- name: far\n  weight: .inf\n";
        let mut source = RecordSource::parse(text, "sites.yml", "name").unwrap();
        assert!(source.next().unwrap().is_ok());
        let err = source.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            LoadError::InvalidRecord { index: 1, ref reason, .. } if reason.contains("finite")
        ));
        assert!(matches!(source.next().unwrap(), Err(LoadError::InvalidRecord { index: 2, .. })));
    }

    #[test]
    fn non_finite_mapping_key_is_invalid_record() {
        let mut source = RecordSource::parse(".nan:\n  status: active\n", "sites.yml", "name").unwrap();
        assert!(matches!(source.next().unwrap(), Err(LoadError::InvalidRecord { index: 0, .. })));
    }

    #[test]
    fn broken_yaml_is_parse_error() {
        let err = RecordSource::parse("- name: [unclosed\n", "sites.yml", "name").err().unwrap();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordSource::open(&dir.path().join("sites.yml"), "name").err().unwrap();
        assert!(matches!(err, LoadError::MissingFile { .. }));
        assert!(!err.is_loader_fatal());
    }

    #[test]
    fn nested_values_convert() {
        let out = records(
            "- name: web\n  custom_field_data:\n    owner: noc\n    rank: 3\n  tags: [a, b]\n",
        );
        assert_eq!(
            out[0].get("custom_field_data"),
            Some(&FieldValue::Value(json!({"owner": "noc", "rank": 3})))
        );
        assert_eq!(out[0].get("tags"), Some(&FieldValue::Value(json!(["a", "b"]))));
    }
}
