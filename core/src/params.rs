//! Request parameters and their text encoding.

use std::collections::BTreeMap;

use crate::{Error, Result};

/// A single logical parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Absent value, never transmitted.
    Null,
    /// Text.
    Str(String),
    /// Raw bytes, must be valid UTF-8 at encoding time.
    Bytes(Vec<u8>),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Repeated parameter, one wire entry per element.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Render a scalar value as text.
    ///
    /// Returns `Ok(None)` for [`ParamValue::Null`].
    fn to_text(&self) -> Result<Option<String>> {
        let s = match self {
            ParamValue::Null => return Ok(None),
            ParamValue::Str(v) => v.clone(),
            ParamValue::Bytes(v) => String::from_utf8(v.clone()).map_err(|e| {
                Error::request_invalid(format!("parameter is not valid utf-8: {e}"))
                    .with_source(e)
            })?,
            ParamValue::Int(v) => v.to_string(),
            ParamValue::Float(v) => v.to_string(),
            ParamValue::Bool(v) => v.to_string(),
            ParamValue::List(_) => {
                return Err(Error::request_invalid(
                    "nested lists are not supported as parameter values",
                ))
            }
        };

        Ok(Some(s))
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<&String> for ParamValue {
    fn from(v: &String) -> Self {
        ParamValue::Str(v.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v.into())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::List(v.into_iter().map(Into::into).collect())
    }
}

/// Mapping from parameter name to value.
///
/// Iteration is ordered by name so the encoded form is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMap(BTreeMap<String, ParamValue>);

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value and return the map, for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of entries, absent values included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parameters ready to be serialized: logical `(key, value)` pairs.
///
/// Values are plain text here, percent-encoding happens when the request is
/// built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedParams(Vec<(String, String)>);

impl EncodedParams {
    /// All pairs, repeated keys included.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Whether there is nothing to transmit.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values transmitted under `key`.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Serialize as `application/x-www-form-urlencoded`.
    pub fn to_form_urlencoded(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

/// Encode parameters into text pairs.
///
/// - absent values are dropped,
/// - numbers and booleans take their canonical text form,
/// - lists become one pair per element under the same key,
/// - bytes must be valid UTF-8.
pub fn encode(params: &ParameterMap) -> Result<EncodedParams> {
    let mut pairs = Vec::with_capacity(params.len());

    for (k, v) in params.iter() {
        match v {
            ParamValue::List(items) => {
                for item in items {
                    if let Some(s) = item.to_text()? {
                        pairs.push((k.to_string(), s));
                    }
                }
            }
            _ => {
                if let Some(s) = v.to_text()? {
                    pairs.push((k.to_string(), s));
                }
            }
        }
    }

    Ok(EncodedParams(pairs))
}
