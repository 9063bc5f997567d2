//! Raw contract results and field normalization
//!
//! A struct getter comes back either as an ordered tuple or as named fields,
//! depending on which ABI description the backend decoded it with. Entity
//! decoders read through [`RawRecord::field`], which tries the name first and
//! falls back to the canonical position.

use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

/// Single decoded ABI value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LedgerValue {
    Uint(u128),
    Bool(bool),
    Text(String),
    Address(String),
}

impl LedgerValue {
    /// Name used in decode errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Uint(_) => "uint",
            Self::Bool(_) => "bool",
            Self::Text(_) => "string",
            Self::Address(_) => "address",
        }
    }
}

/// Record as returned by a struct getter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawRecord {
    /// Outputs in declaration order, no names
    Positional(Vec<LedgerValue>),
    /// Outputs with their ABI names, in declaration order
    Named(Vec<(String, LedgerValue)>),
}

/// Location of one field in a getter's output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// ABI output name
    pub name: &'static str,
    /// Position in the output tuple
    pub index: usize,
}

impl RawRecord {
    /// Number of fields present
    pub fn len(&self) -> usize {
        match self {
            Self::Positional(values) => values.len(),
            Self::Named(fields) => fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a field up by name, falling back to its position
    pub fn field(&self, spec: FieldSpec) -> Option<&LedgerValue> {
        match self {
            Self::Positional(values) => values.get(spec.index),
            Self::Named(fields) => fields
                .iter()
                .find(|(name, _)| name == spec.name)
                .or_else(|| fields.get(spec.index))
                .map(|(_, value)| value),
        }
    }

    fn require(&self, entity: &str, spec: FieldSpec) -> Result<&LedgerValue> {
        self.field(spec).ok_or_else(|| {
            LedgerError::Decode(format!(
                "{} record has no field '{}' (index {}), got {} fields",
                entity,
                spec.name,
                spec.index,
                self.len()
            ))
        })
    }

    /// Numeric field coerced to `u64`
    ///
    /// Decimal strings are accepted, values above `u64::MAX` are not.
    pub fn u64_field(&self, entity: &str, spec: FieldSpec) -> Result<u64> {
        let value = self.require(entity, spec)?;
        let number = match value {
            LedgerValue::Uint(v) => u64::try_from(*v).ok(),
            LedgerValue::Text(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        number.ok_or_else(|| mismatch(entity, spec, "uint64", value))
    }

    /// Text field
    pub fn string_field(&self, entity: &str, spec: FieldSpec) -> Result<String> {
        match self.require(entity, spec)? {
            LedgerValue::Text(s) => Ok(s.clone()),
            other => Err(mismatch(entity, spec, "string", other)),
        }
    }

    /// Address field as a lowercase `0x` string
    pub fn address_field(&self, entity: &str, spec: FieldSpec) -> Result<String> {
        match self.require(entity, spec)? {
            LedgerValue::Address(s) | LedgerValue::Text(s) => Ok(s.to_ascii_lowercase()),
            other => Err(mismatch(entity, spec, "address", other)),
        }
    }

    /// Boolean field, `0`/`1` integers are accepted
    pub fn bool_field(&self, entity: &str, spec: FieldSpec) -> Result<bool> {
        match self.require(entity, spec)? {
            LedgerValue::Bool(b) => Ok(*b),
            LedgerValue::Uint(0) => Ok(false),
            LedgerValue::Uint(1) => Ok(true),
            other => Err(mismatch(entity, spec, "bool", other)),
        }
    }
}

fn mismatch(entity: &str, spec: FieldSpec, expected: &str, got: &LedgerValue) -> LedgerError {
    LedgerError::Decode(format!(
        "{} field '{}' expected {}, got {} ({:?})",
        entity,
        spec.name,
        expected,
        got.type_name(),
        got
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: FieldSpec = FieldSpec { name: "id", index: 0 };
    const NAME: FieldSpec = FieldSpec { name: "name", index: 1 };
    const FLAG: FieldSpec = FieldSpec { name: "verified", index: 2 };

    #[test]
    fn test_positional_lookup() {
        let record = RawRecord::Positional(vec![
            LedgerValue::Uint(3),
            LedgerValue::Text("Ada".into()),
            LedgerValue::Bool(true),
        ]);
        assert_eq!(record.u64_field("farmer", ID).unwrap(), 3);
        assert_eq!(record.string_field("farmer", NAME).unwrap(), "Ada");
        assert!(record.bool_field("farmer", FLAG).unwrap());
    }

    #[test]
    fn test_named_lookup_ignores_order() {
        let record = RawRecord::Named(vec![
            ("verified".into(), LedgerValue::Bool(false)),
            ("name".into(), LedgerValue::Text("Ada".into())),
            ("id".into(), LedgerValue::Uint(3)),
        ]);
        assert_eq!(record.u64_field("farmer", ID).unwrap(), 3);
        assert_eq!(record.string_field("farmer", NAME).unwrap(), "Ada");
        assert!(!record.bool_field("farmer", FLAG).unwrap());
    }

    #[test]
    fn test_named_falls_back_to_index() {
        let record = RawRecord::Named(vec![
            (String::new(), LedgerValue::Uint(9)),
            (String::new(), LedgerValue::Text("Grace".into())),
        ]);
        assert_eq!(record.u64_field("farmer", ID).unwrap(), 9);
        assert_eq!(record.string_field("farmer", NAME).unwrap(), "Grace");
    }

    #[test]
    fn test_numeric_coercion() {
        let record = RawRecord::Positional(vec![LedgerValue::Text(" 12 ".into())]);
        assert_eq!(record.u64_field("produce", ID).unwrap(), 12);

        let record = RawRecord::Positional(vec![LedgerValue::Uint(u128::from(u64::MAX) + 1)]);
        assert!(matches!(
            record.u64_field("produce", ID),
            Err(LedgerError::Decode(_))
        ));
    }

    #[test]
    fn test_bool_coercion() {
        let record = RawRecord::Positional(vec![
            LedgerValue::Uint(0),
            LedgerValue::Uint(1),
            LedgerValue::Uint(2),
        ]);
        assert!(!record.bool_field("x", FieldSpec { name: "a", index: 0 }).unwrap());
        assert!(record.bool_field("x", FieldSpec { name: "b", index: 1 }).unwrap());
        assert!(record.bool_field("x", FieldSpec { name: "c", index: 2 }).is_err());
    }

    #[test]
    fn test_missing_field() {
        let record = RawRecord::Positional(vec![LedgerValue::Uint(1)]);
        let err = record.string_field("farmer", NAME).unwrap_err();
        assert!(err.to_string().contains("no field 'name'"));
    }

    #[test]
    fn test_type_mismatch() {
        let record = RawRecord::Positional(vec![LedgerValue::Bool(true)]);
        let err = record.u64_field("farmer", ID).unwrap_err();
        assert!(err.to_string().contains("expected uint64, got bool"));
    }
}
