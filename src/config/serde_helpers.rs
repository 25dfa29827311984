//! Utility functions for serde serialization/deserialization.
//!
//! This module contains helper functions commonly used with serde's
//! `skip_serializing_if` and `default` attributes.

use serde::{Deserialize, Deserializer};

/// Returns `true` if the boolean value is `false`.
///
/// Used with `#[serde(skip_serializing_if = "is_false")]` to omit false values.
#[inline]
pub fn is_false(b: &bool) -> bool {
    !*b
}

/// Returns `true` if the u32 value is zero.
///
/// Used with `#[serde(skip_serializing_if = "is_zero_u32")]` to omit zero values.
#[inline]
pub fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

/// Helper enum for deserializing fields that can be either a single string
/// or an array of strings.
///
/// Many sing-box config fields accept both formats:
/// - `"rule_set": "single-rule"` (single string)
/// - `"rule_set": ["rule1", "rule2"]` (array of strings)
#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrVec {
    Single(String),
    Multiple(Vec<String>),
}

/// Deserializes a field that can be either a single string or an array of strings.
///
/// Use with `#[serde(default, deserialize_with = "string_or_vec")]`
pub fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::Single(s) => Ok(vec![s]),
        StringOrVec::Multiple(v) => Ok(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_false() {
        assert!(is_false(&false));
        assert!(!is_false(&true));
    }

    #[test]
    fn test_is_zero_u32() {
        assert!(is_zero_u32(&0));
        assert!(!is_zero_u32(&50));
    }

    #[test]
    fn test_string_or_vec_single() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "super::string_or_vec")]
            values: Vec<String>,
        }

        let json = r#"{"values": "single"}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.values, vec!["single"]);
    }

    #[test]
    fn test_string_or_vec_multiple() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "super::string_or_vec")]
            values: Vec<String>,
        }

        let json = r#"{"values": ["one", "two"]}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert_eq!(result.values, vec!["one", "two"]);
    }

    #[test]
    fn test_string_or_vec_missing() {
        #[derive(Deserialize)]
        struct TestStruct {
            #[serde(default, deserialize_with = "super::string_or_vec")]
            values: Vec<String>,
        }

        let json = r#"{}"#;
        let result: TestStruct = serde_json::from_str(json).unwrap();
        assert!(result.values.is_empty());
    }
}
