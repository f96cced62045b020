//! Log-safe projections of decoded records

use crate::registry::FieldDescriptor;
use crate::tree::Tree;

/// Replacement for sensitive values
pub const MASK: &str = "***";

/// Copy of `decoded` with sensitive top-level fields masked
///
/// Only top-level keys are inspected; values nested inside blocks are
/// copied as they are. The input is never modified.
pub fn redact(decoded: &Tree, descriptors: &[FieldDescriptor]) -> Tree {
    let Some(map) = decoded.as_map() else {
        return decoded.clone();
    };

    map.iter()
        .map(|(key, value)| {
            let sensitive = descriptors
                .iter()
                .any(|d| d.sensitive && d.name == *key);
            if sensitive {
                (key.clone(), Tree::from(MASK))
            } else {
                (key.clone(), value.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptors() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                name: "application_key".to_string(),
                sensitive: true,
                deprecated: false,
            },
            FieldDescriptor {
                name: "key_name".to_string(),
                sensitive: false,
                deprecated: false,
            },
        ]
    }

    #[test]
    fn masks_sensitive_fields_in_a_copy() {
        let decoded =
            Tree::from_json(br#"{"application_key":"secret","key_name":"ci"}"#).unwrap();
        let original = decoded.clone();

        let safe = redact(&decoded, &descriptors());

        assert_eq!(safe.get("application_key"), Some(&Tree::from(MASK)));
        assert_eq!(safe.get("key_name"), Some(&Tree::from("ci")));
        assert_eq!(decoded, original);
    }

    #[test]
    fn keeps_fields_without_descriptor() {
        let decoded = Tree::from_json(br#"{"options":["s3"]}"#).unwrap();
        assert_eq!(redact(&decoded, &descriptors()), decoded);
    }

    #[test]
    fn nested_values_are_not_inspected() {
        let decoded =
            Tree::from_json(br#"{"rules":[{"application_key":"secret"}]}"#).unwrap();
        assert_eq!(redact(&decoded, &descriptors()), decoded);
    }

    #[test]
    fn non_map_input_is_copied() {
        let decoded = Tree::from("plain");
        assert_eq!(redact(&decoded, &descriptors()), decoded);
    }
}
