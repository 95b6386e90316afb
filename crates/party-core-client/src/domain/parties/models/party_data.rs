// party-core-client/party-core-client
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A single attribute value. The wire form tags the variant so that foreign
/// readers can interpret the scalar without guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Value")]
pub enum DataValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::I64(value)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::F64(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

/// Named attributes attached to a party or to a single member. Iteration
/// order is insertion order, equality ignores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartyData {
    attrs: IndexMap<String, DataValue>,
}

impl PartyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&DataValue> {
        self.attrs.get(name)
    }

    /// Inserts or overwrites a single attribute, all others are preserved.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<DataValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Serializes the attributes as `{"Attrs": [{"Name": …, "Type": …, "Value": …}]}`.
    pub fn to_json(&self) -> String {
        let records = self
            .attrs
            .iter()
            .map(|(name, value)| {
                let mut record = serde_json::to_value(value).unwrap_or(Value::Null);
                if let Value::Object(map) = &mut record {
                    map.insert("Name".to_string(), Value::String(name.clone()));
                }
                record
            })
            .collect::<Vec<_>>();

        Value::Object(serde_json::Map::from_iter([(
            "Attrs".to_string(),
            Value::Array(records),
        )]))
        .to_string()
    }

    /// Parses the structured text form. Malformed or unknown records are
    /// skipped, a malformed document yields an empty blob.
    pub fn from_json(json: &str) -> Self {
        let mut data = PartyData::new();

        let Ok(Value::Object(root)) = serde_json::from_str::<Value>(json) else {
            warn!("Discarding malformed party data document");
            return data;
        };
        let Some(Value::Array(records)) = root.get("Attrs") else {
            return data;
        };

        for record in records {
            let Some(name) = record.get("Name").and_then(Value::as_str) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let Ok(value) = serde_json::from_value::<DataValue>(record.clone()) else {
                continue;
            };
            data.set(name, value);
        }

        data
    }
}

impl FromIterator<(String, DataValue)> for PartyData {
    fn from_iter<T: IntoIterator<Item = (String, DataValue)>>(iter: T) -> Self {
        Self {
            attrs: IndexMap::from_iter(iter),
        }
    }
}
