use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::config::DEFAULT_TRAIT_VALUE;

/// One token's metadata document as published alongside the collection
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataDocument {
    pub name: Option<String>,
    pub description: Option<String>,
    pub collection: Option<String>,
    pub image: Option<String>,
    pub fee_recipient: Option<String>,
    pub seller_fee_basis_points: Option<Value>,
    #[serde(rename = "tokenURI")]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// A `{trait_type, value}` pair from the `attributes` list
#[derive(Debug, Clone, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl MetadataDocument {
    /// Traits keyed by lower-cased trait type. Later duplicates win.
    pub fn traits(&self) -> BTreeMap<String, Value> {
        self.attributes
            .iter()
            .map(|attr| {
                let value = attr
                    .value
                    .clone()
                    .unwrap_or_else(|| Value::String(DEFAULT_TRAIT_VALUE.to_string()));
                (attr.trait_type.to_lowercase(), coerce_digits(value))
            })
            .collect()
    }
}

/// Turn a digit-only string into an integer; everything else passes through
pub fn coerce_digits(value: Value) -> Value {
    if let Value::String(s) = &value {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<i64>() {
                return Value::from(n);
            }
        }
    }
    value
}

/// Read a numeric trait, falling back to 0 when absent or not a
/// non-negative number
pub fn numeric_trait(value: Option<&Value>) -> i64 {
    let Some(Value::Number(n)) = value else {
        return 0;
    };

    n.as_i64()
        .or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        })
        .filter(|v| *v >= 0)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_traits_are_case_folded_and_coerced() {
        let doc: MetadataDocument = serde_json::from_value(json!({
            "attributes": [
                {"trait_type": "Attack", "value": "12"},
                {"trait_type": "Background", "value": "Rare"},
                {"trait_type": "Mood"}
            ]
        }))
        .unwrap();

        let traits = doc.traits();
        assert_eq!(traits["attack"], json!(12));
        assert_eq!(traits["background"], json!("Rare"));
        assert_eq!(traits["mood"], json!("Unknown"));
    }

    #[test]
    fn test_coerce_digits() {
        assert_eq!(coerce_digits(json!("007")), json!(7));
        assert_eq!(coerce_digits(json!("-3")), json!("-3"));
        assert_eq!(coerce_digits(json!("")), json!(""));
        assert_eq!(coerce_digits(json!(1.5)), json!(1.5));
    }

    #[test]
    fn test_numeric_trait() {
        assert_eq!(numeric_trait(Some(&json!(10))), 10);
        assert_eq!(numeric_trait(Some(&json!(7.9))), 7);
        assert_eq!(numeric_trait(Some(&json!(-4))), 0);
        assert_eq!(numeric_trait(Some(&json!("fast"))), 0);
        assert_eq!(numeric_trait(None), 0);
    }

    #[test]
    fn test_missing_trait_type_is_rejected() {
        let result: Result<MetadataDocument, _> =
            serde_json::from_value(json!({"attributes": [{"value": 3}]}));
        assert!(result.is_err());
    }
}
