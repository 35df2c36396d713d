// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Request parameters.

use crate::{Error, Result};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Value stored in a [`ParameterMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain text value.
    String(String),
    /// Ordered list of values.
    List(Vec<Value>),
    /// Nested parameters.
    Map(ParameterMap),
}

impl Value {
    /// Returns the text if this value is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns true if the value carries nothing worth signing or sending.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::String(s) => s.is_empty(),
            Value::List(v) => v.is_empty(),
            Value::Map(m) => m.is_empty(),
        }
    }

    /// Render the value as text.
    ///
    /// Strings are returned verbatim, lists and maps as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            // Serializing our own tree into a String can't fail.
            v => serde_json::to_string(v).unwrap_or_default(),
        }
    }

    fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(match value {
            serde_json::Value::Null => {
                return Err(Error::invalid_value("null is not a supported parameter value"))
            }
            serde_json::Value::Bool(v) => Value::String(v.to_string()),
            serde_json::Value::Number(v) => Value::String(v.to_string()),
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(vs) => Value::List(
                vs.into_iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(kvs) => {
                let mut m = ParameterMap::new();
                for (k, v) in kvs {
                    m.set(k, Value::from_json(v)?);
                }
                Value::Map(m)
            }
        })
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::String(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::String(v.to_string())
    }
}

macro_rules! value_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::String(v.to_string())
                }
            }
        )*
    };
}

value_from_integer!(i32, i64, u8, u16, u32, u64, usize);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<ParameterMap> for Value {
    fn from(v: ParameterMap) -> Self {
        Value::Map(v)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::List(vs) => {
                let mut seq = serializer.serialize_seq(Some(vs.len()))?;
                for v in vs {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Value::Map(m) => m.serialize(serializer),
        }
    }
}

/// ParameterMap is the ordered key/value container every request is built from.
///
/// Keys are unique. Insertion order is kept for transport serialization while
/// signing always works on the key-sorted view. A map is owned by exactly one
/// request and is never shared between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    entries: Vec<(String, Value)>,
}

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder flavored [`ParameterMap::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` from any serializable value.
    ///
    /// Returns [`ErrorKind::InvalidValue`](crate::ErrorKind::InvalidValue) if the value
    /// can't be represented as a parameter, for example `None` or a JSON `null`.
    pub fn try_set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<&mut Self> {
        let key = key.into();
        let json = serde_json::to_value(value).map_err(|e| {
            Error::invalid_value(format!("value of {key} is not serializable")).with_source(e)
        })?;
        let value = Value::from_json(json)
            .map_err(|e| Error::invalid_value(format!("value of {key}: {}", e.message())))?;
        Ok(self.set(key, value))
    }

    /// Get the value of `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get the value of `key` as text, returns an empty string if absent.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(Value::to_text).unwrap_or_default()
    }

    /// Remove `key` and return its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Check if `key` is present, regardless of its value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Check if `key` is absent or holds an empty value.
    pub fn is_empty_value(&self, key: &str) -> bool {
        self.get(key).map(Value::is_empty).unwrap_or(true)
    }

    /// Fail with [`ErrorKind::MissingField`](crate::ErrorKind::MissingField) naming
    /// the first key that is absent or empty.
    pub fn require_non_empty<S: AsRef<str>>(&self, keys: &[S]) -> Result<()> {
        match keys.iter().find(|k| self.is_empty_value(k.as_ref())) {
            Some(k) => Err(Error::missing_field(k)),
            None => Ok(()),
        }
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ParameterMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut m = ParameterMap::new();
        for (k, v) in iter {
            m.set(k, v);
        }
        m
    }
}

impl Serialize for ParameterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
