use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, Serializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::codec::CodecError;

/// A string-keyed document of wire values.
///
/// Uses `BTreeMap` so encoded documents have a deterministic key order.
pub type Document = BTreeMap<String, Value>;

/// Generic wire value carried in function arguments and results.
///
/// Supports all JSON-compatible types plus binary data. Serializes as the
/// native shape of each format (`[0, 1, 2]`, not `{"Array": [...]}`).
///
/// Human-readable formats (JSON) have no lossless form for `Bytes` or for
/// NaN and infinite floats, so serializing those into such a format is an
/// error rather than a silent rewrite. `MsgPack` carries both natively.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed 64-bit integer.
    Int(i64),
    /// 64-bit IEEE 754 float.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Binary data (`bin` in `MsgPack`; rejected by JSON).
    Bytes(Vec<u8>),
    /// String-keyed map.
    Map(Document),
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(f) => {
                if !f.is_finite() && serializer.is_human_readable() {
                    return Err(ser::Error::custom(format!(
                        "float {f} has no representation in a text format"
                    )));
                }
                serializer.serialize_f64(*f)
            }
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Bytes(bytes) => {
                if serializer.is_human_readable() {
                    return Err(ser::Error::custom(format!(
                        "binary value ({} bytes) has no representation in a text format",
                        bytes.len()
                    )));
                }
                serializer.serialize_bytes(bytes)
            }
            Self::Map(doc) => serializer.collect_map(doc),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a wire value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    // Integers above i64::MAX only fit a float.
    #[allow(clippy::cast_precision_loss)]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Bytes(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(1024));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut doc = Document::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            doc.insert(key, value);
        }
        Ok(Value::Map(doc))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl Value {
    /// Converts any serializable value into a `Value`.
    ///
    /// Structs become maps with their serialized field names; fields skipped
    /// during serialization are absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if `value` cannot be serialized.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, CodecError> {
        let bytes = rmp_serde::to_vec_named(value)?;
        Ok(rmp_serde::from_slice(&bytes)?)
    }

    /// Converts this value into a concrete type.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the value's shape does not match `T`.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, CodecError> {
        let bytes = rmp_serde::to_vec_named(self)?;
        Ok(rmp_serde::from_slice(&bytes)?)
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Self::Map(doc) => Some(doc),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Document> for Value {
    fn from(v: Document) -> Self {
        Self::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Greeting {
        to_name: String,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        suffix: Option<String>,
    }

    #[test]
    fn serializes_untagged_as_json() {
        let v = Value::Array(vec![Value::Int(0), Value::from("a"), Value::Null]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"[0,"a",null]"#);
    }

    #[test]
    fn json_numbers_prefer_int() {
        let v: Value = serde_json::from_str("[1, 1.5]").unwrap();
        assert_eq!(v, Value::Array(vec![Value::Int(1), Value::Float(1.5)]));
    }

    #[test]
    fn msgpack_bytes_stay_bytes() {
        let v = Value::Bytes(vec![1, 2, 3]);
        let bytes = rmp_serde::to_vec_named(&v).unwrap();
        let back: Value = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn msgpack_utf8_bytes_are_not_mistaken_for_strings() {
        for blob in [vec![], b"abc".to_vec()] {
            let bytes = rmp_serde::to_vec_named(&Value::Bytes(blob.clone())).unwrap();
            let back: Value = rmp_serde::from_slice(&bytes).unwrap();
            assert_eq!(back, Value::Bytes(blob));
        }
    }

    #[test]
    fn json_refuses_bytes_and_non_finite_floats() {
        assert!(serde_json::to_vec(&Value::Bytes(vec![1, 2])).is_err());
        assert!(serde_json::to_vec(&Value::Float(f64::NAN)).is_err());
        assert!(serde_json::to_vec(&Value::Float(f64::NEG_INFINITY)).is_err());
        let nested = Value::Array(vec![Value::Int(1), Value::Bytes(vec![0])]);
        assert!(serde_json::to_vec(&nested).is_err());
    }

    #[test]
    fn msgpack_keeps_non_finite_floats() {
        let bytes = rmp_serde::to_vec_named(&Value::Float(f64::INFINITY)).unwrap();
        let back: Value = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(back, Value::Float(f64::INFINITY));

        let bytes = rmp_serde::to_vec_named(&Value::Float(f64::NAN)).unwrap();
        let back: Value = rmp_serde::from_slice(&bytes).unwrap();
        assert!(matches!(back, Value::Float(f) if f.is_nan()));
    }

    #[test]
    fn large_unsigned_becomes_float() {
        let v: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert!(matches!(v, Value::Float(_)));
        let v: Value = serde_json::from_str("7").unwrap();
        assert_eq!(v, Value::Int(7));
    }

    #[test]
    fn from_serialize_omits_skipped_fields() {
        let v = Value::from_serialize(&Greeting {
            to_name: "bob".to_string(),
            suffix: None,
        })
        .unwrap();
        let doc = v.as_document().unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.get("toName").and_then(Value::as_str), Some("bob"));
    }

    #[test]
    fn deserialize_into_struct() {
        let mut doc = Document::new();
        doc.insert("toName".to_string(), Value::from("alice"));
        doc.insert("suffix".to_string(), Value::from("!"));
        let greeting: Greeting = Value::Map(doc).deserialize_into().unwrap();
        assert_eq!(
            greeting,
            Greeting {
                to_name: "alice".to_string(),
                suffix: Some("!".to_string()),
            }
        );
    }

    #[test]
    fn option_none_converts_to_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some(3_i64)).as_i64(), Some(3));
    }
}
