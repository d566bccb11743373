//! Item composition
//!
//! Builds exactly one output record from an input record and a parsed
//! document, honoring the configured composition mode.

use serde_json::{Map, Value};

use recast_record::{Record, SchemaVersion};

use crate::options::{MergePolicy, OutputMode, OutputOptions};

/// Compose the output record for the item at `index`
///
/// Total over well-formed inputs: given a valid field mapping this always
/// returns exactly one record. Pairing metadata is attached unconditionally,
/// shaped by `version`; binary attachments are copied only when
/// `include_binary` is set.
#[must_use]
pub fn compose(
    original: &Record,
    new_data: Map<String, Value>,
    options: &OutputOptions,
    version: SchemaVersion,
    index: usize,
) -> Record {
    let base = match options.mode {
        OutputMode::KeepOnlySet => Map::new(),
        OutputMode::Merge => original.fields.clone(),
    };
    let fields = apply_fields(base, new_data, options);

    let mut record = Record::from_fields(fields).with_pairing(version.pairing_for(index));
    if options.include_binary {
        if let Some(binary) = &original.binary {
            record = record.with_binary(binary.clone());
        }
    }
    record
}

/// Apply each new field on top of `base`, new values winning on conflict.
fn apply_fields(
    mut base: Map<String, Value>,
    new_data: Map<String, Value>,
    options: &OutputOptions,
) -> Map<String, Value> {
    for (name, value) in new_data {
        if options.dot_notation && name.contains('.') {
            set_path(&mut base, &name, value);
        } else {
            match options.merge_policy {
                MergePolicy::Shallow => {
                    base.insert(name, value);
                }
                MergePolicy::Deep => deep_insert(&mut base, name, value),
            }
        }
    }
    base
}

/// Set a dotted path, creating intermediate mappings as needed.
///
/// Sibling keys of existing intermediate mappings are preserved;
/// intermediate values that are not mappings are replaced.
fn set_path(fields: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            fields.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let slot = fields
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(inner) = slot {
                set_path(inner, rest, value);
            } else {
                let mut inner = Map::new();
                set_path(&mut inner, rest, value);
                *slot = Value::Object(inner);
            }
        }
    }
}

/// Insert under `name`, merging mapping-into-mapping recursively.
fn deep_insert(base: &mut Map<String, Value>, name: String, value: Value) {
    match value {
        Value::Object(incoming) => {
            if let Some(Value::Object(existing)) = base.get_mut(&name) {
                for (key, nested) in incoming {
                    deep_insert(existing, key, nested);
                }
            } else {
                base.insert(name, Value::Object(incoming));
            }
        }
        other => {
            base.insert(name, other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recast_record::BinaryAttachment;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn mapping(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn ann() -> Record {
        Record::from_fields(mapping(&[("name", json!("Ann"))]))
    }

    fn keep_only() -> OutputOptions {
        OutputOptions {
            mode: OutputMode::KeepOnlySet,
            ..OutputOptions::default()
        }
    }

    #[test]
    fn test_keep_only_set_drops_original_fields() {
        let new_data = mapping(&[("age", json!(30))]);

        let out = compose(
            &ann(),
            new_data.clone(),
            &keep_only(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.fields, new_data);
    }

    #[test]
    fn test_merge_keeps_original_fields_and_new_values_win() {
        let new_data = mapping(&[("age", json!(30))]);

        let out = compose(
            &ann(),
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(
            out.fields,
            mapping(&[("name", json!("Ann")), ("age", json!(30))])
        );
    }

    #[test]
    fn test_merge_conflicts_resolve_to_the_new_value() {
        let original = Record::from_fields(mapping(&[("age", json!(20)), ("name", json!("Ann"))]));
        let new_data = mapping(&[("age", json!(30))]);

        let out = compose(
            &original,
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("age"), Some(&json!(30)));
        assert_eq!(out.field("name"), Some(&json!("Ann")));
    }

    #[test]
    fn test_merge_is_idempotent_for_identical_new_data() {
        let new_data = mapping(&[("age", json!(30)), ("city", json!("NYC"))]);
        let options = OutputOptions::default();

        let once = compose(&ann(), new_data.clone(), &options, SchemaVersion::Current, 0);
        let twice = compose(&once, new_data, &options, SchemaVersion::Current, 0);
        assert_eq!(once.fields, twice.fields);
    }

    #[test]
    fn test_dot_notation_expands_into_nested_structure() {
        let new_data = mapping(&[("address.city", json!("NYC"))]);

        let out = compose(
            &Record::new(),
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("address"), Some(&json!({"city": "NYC"})));
    }

    #[test]
    fn test_disabled_dot_notation_keeps_flat_keys() {
        let new_data = mapping(&[("address.city", json!("NYC"))]);
        let options = OutputOptions {
            dot_notation: false,
            ..OutputOptions::default()
        };

        let out = compose(
            &Record::new(),
            new_data,
            &options,
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("address.city"), Some(&json!("NYC")));
        assert_eq!(out.field("address"), None);
    }

    #[test]
    fn test_dotted_paths_preserve_sibling_keys() {
        let original =
            Record::from_fields(mapping(&[("address", json!({"zip": "10001", "city": "LA"}))]));
        let new_data = mapping(&[("address.city", json!("NYC"))]);

        let out = compose(
            &original,
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(
            out.field("address"),
            Some(&json!({"zip": "10001", "city": "NYC"}))
        );
    }

    #[test]
    fn test_dotted_paths_replace_non_mapping_intermediates() {
        let original = Record::from_fields(mapping(&[("address", json!("unknown"))]));
        let new_data = mapping(&[("address.city", json!("NYC"))]);

        let out = compose(
            &original,
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("address"), Some(&json!({"city": "NYC"})));
    }

    #[test]
    fn test_shallow_policy_overwrites_nested_mappings_wholesale() {
        let original = Record::from_fields(mapping(&[("address", json!({"zip": "10001"}))]));
        let new_data = mapping(&[("address", json!({"city": "NYC"}))]);

        let out = compose(
            &original,
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("address"), Some(&json!({"city": "NYC"})));
    }

    #[test]
    fn test_deep_policy_merges_nested_mappings_recursively() {
        let original = Record::from_fields(mapping(&[("address", json!({"zip": "10001"}))]));
        let new_data = mapping(&[("address", json!({"city": "NYC"}))]);
        let options = OutputOptions {
            merge_policy: MergePolicy::Deep,
            ..OutputOptions::default()
        };

        let out = compose(
            &original,
            new_data,
            &options,
            SchemaVersion::Current,
            0,
        );
        assert_eq!(
            out.field("address"),
            Some(&json!({"zip": "10001", "city": "NYC"}))
        );
    }

    #[test]
    fn test_deep_policy_still_replaces_scalar_conflicts() {
        let original = Record::from_fields(mapping(&[("age", json!(20))]));
        let new_data = mapping(&[("age", json!(30))]);
        let options = OutputOptions {
            merge_policy: MergePolicy::Deep,
            ..OutputOptions::default()
        };

        let out = compose(
            &original,
            new_data,
            &options,
            SchemaVersion::Current,
            0,
        );
        assert_eq!(out.field("age"), Some(&json!(30)));
    }

    #[test]
    fn test_binary_attachments_follow_the_include_flag() {
        let mut binary = BTreeMap::new();
        binary.insert(
            "avatar".to_string(),
            BinaryAttachment::new("image/png", "aGVsbG8="),
        );
        let original = ann().with_binary(binary.clone());
        let new_data = mapping(&[("age", json!(30))]);

        let without = compose(
            &original,
            new_data.clone(),
            &OutputOptions::default(),
            SchemaVersion::Current,
            0,
        );
        assert!(without.binary.is_none());

        let options = OutputOptions {
            include_binary: true,
            ..OutputOptions::default()
        };
        let with = compose(&original, new_data, &options, SchemaVersion::Current, 0);
        assert_eq!(with.binary, Some(binary));
    }

    #[test]
    fn test_pairing_shape_follows_the_schema_version() {
        let new_data = mapping(&[("age", json!(30))]);

        let legacy = compose(
            &ann(),
            new_data.clone(),
            &OutputOptions::default(),
            SchemaVersion::Legacy,
            5,
        );
        let current = compose(
            &ann(),
            new_data,
            &OutputOptions::default(),
            SchemaVersion::Current,
            5,
        );

        assert_eq!(
            serde_json::to_value(legacy.pairing.unwrap()).unwrap(),
            json!({"item": 5})
        );
        assert_eq!(
            serde_json::to_value(current.pairing.unwrap()).unwrap(),
            json!([{"item": 5}])
        );
    }
}
