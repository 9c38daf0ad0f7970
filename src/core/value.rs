use crate::core::value_path::{PathSegment, ValuePath};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// A value answers a required field unless it is `Null` or an empty string.
    /// `false`, `0` and empty collections count as answered.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Text(v) => !v.is_empty(),
            _ => true,
        }
    }

    pub fn get_path(&self, path: &ValuePath) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Self::Object(map)) => map.get(key.as_str())?,
                (PathSegment::Index(index), Self::List(list)) => list.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn set_path(&mut self, path: &ValuePath, value: Value) {
        let mut current = self;
        for (idx, segment) in path.segments().iter().enumerate() {
            let next = path.segments().get(idx + 1);
            current = match segment {
                PathSegment::Key(key) => {
                    if !matches!(current, Self::Object(_)) {
                        *current = Self::Object(IndexMap::new());
                    }
                    let Self::Object(map) = current else {
                        return;
                    };
                    map.entry(key.clone())
                        .or_insert_with(|| container_for_next(next))
                }
                PathSegment::Index(index) => {
                    if !matches!(current, Self::List(_)) {
                        *current = Self::List(Vec::new());
                    }
                    let Self::List(list) = current else {
                        return;
                    };
                    if list.len() <= *index {
                        list.resize_with(index + 1, || Self::Null);
                    }
                    let slot = &mut list[*index];
                    if matches!(slot, Self::Null) {
                        *slot = container_for_next(next);
                    }
                    slot
                }
            };
        }
        *current = value;
    }
}

fn container_for_next(next: Option<&PathSegment>) -> Value {
    match next {
        Some(PathSegment::Index(_)) => Value::List(Vec::new()),
        Some(PathSegment::Key(_)) => Value::Object(IndexMap::new()),
        None => Value::Null,
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(v) => Self::Bool(v),
            serde_json::Value::Number(v) => Self::Number(v),
            serde_json::Value::String(v) => Self::Text(v),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(v) => Self::Bool(v),
            Value::Number(v) => Self::Number(v),
            Value::Text(v) => Self::String(v),
            Value::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}
