use crate::core::value::Value;
use crate::core::value_path::{PathSegment, ValuePath};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How required field names are resolved against a [`FormData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLookup {
    /// Direct key equality. `referee1.name` is one literal key.
    #[default]
    Flat,
    /// Literal key first, then the name parsed as a [`ValuePath`] into nested values.
    Nested,
}

#[derive(Debug, Error)]
pub enum FormDataError {
    #[error("form data must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("failed to serialize form record: {0}")]
    Record(#[from] serde_json::Error),
}

/// In-progress submission record for one wizard session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: IndexMap<String, Value>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// `null` stands for a draft that was never saved and yields an empty record.
    pub fn from_json(value: serde_json::Value) -> Result<Self, FormDataError> {
        match Value::from(value) {
            Value::Null => Ok(Self::new()),
            Value::Object(fields) => Ok(Self { fields }),
            Value::Bool(_) => Err(FormDataError::NotAnObject("a boolean")),
            Value::Number(_) => Err(FormDataError::NotAnObject("a number")),
            Value::Text(_) => Err(FormDataError::NotAnObject("a string")),
            Value::List(_) => Err(FormDataError::NotAnObject("a list")),
        }
    }

    /// Builds form data from a typed wizard record. `None` fields become `Null`.
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, FormDataError> {
        Self::from_json(serde_json::to_value(record)?)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Writes `key` the way [`lookup`](Self::lookup) reads it under `mode`.
    ///
    /// With `Nested`, a dotted key that is not already a literal entry is written into
    /// the nested value under its first segment, creating objects and lists as needed.
    pub fn assign(&mut self, key: &str, value: impl Into<Value>, mode: FieldLookup) {
        let value = value.into();
        if mode == FieldLookup::Flat || self.fields.contains_key(key) {
            self.fields.insert(key.to_string(), value);
            return;
        }
        let Ok(path) = ValuePath::parse(key) else {
            self.fields.insert(key.to_string(), value);
            return;
        };
        match path.segments().split_first() {
            Some((PathSegment::Key(root), rest)) if !rest.is_empty() => {
                let rest = ValuePath::new(rest.to_vec());
                self.fields
                    .entry(root.clone())
                    .or_default()
                    .set_path(&rest, value);
            }
            _ => {
                self.fields.insert(key.to_string(), value);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.shift_remove(key)
    }

    /// Overlays `other` on top of this record; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: FormData) {
        self.fields.extend(other.fields);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn lookup(&self, key: &str, mode: FieldLookup) -> Option<&Value> {
        if let Some(value) = self.fields.get(key) {
            return Some(value);
        }
        match mode {
            FieldLookup::Flat => None,
            FieldLookup::Nested => {
                let path = ValuePath::parse(key).ok()?;
                let (first, rest) = path.segments().split_first()?;
                let PathSegment::Key(root) = first else {
                    return None;
                };
                let rest = ValuePath::new(rest.to_vec());
                self.fields.get(root.as_str())?.get_path(&rest)
            }
        }
    }

    /// True when `key` resolves to a value that is not `Null` and not `""`.
    pub fn has_value(&self, key: &str, mode: FieldLookup) -> bool {
        self.lookup(key, mode).is_some_and(Value::is_present)
    }
}

impl From<IndexMap<String, Value>> for FormData {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldLookup, FormData, FormDataError};
    use crate::core::value::Value;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct ContactRecord {
        first_name: String,
        email: Option<String>,
        has_disability: bool,
    }

    #[test]
    fn null_draft_is_empty_record() {
        let data = FormData::from_json(serde_json::Value::Null).expect("null draft");
        assert!(data.is_empty());
    }

    #[test]
    fn non_object_draft_is_rejected() {
        let err = FormData::from_json(json!([1, 2])).expect_err("list draft");
        assert!(matches!(err, FormDataError::NotAnObject("a list")));
    }

    #[test]
    fn typed_record_maps_missing_option_to_null() {
        let data = FormData::from_record(&ContactRecord {
            first_name: "Alice".into(),
            email: None,
            has_disability: false,
        })
        .expect("record");

        assert_eq!(data.get("firstName"), Some(&Value::text("Alice")));
        assert_eq!(data.get("email"), Some(&Value::Null));
        assert!(!data.has_value("email", FieldLookup::Flat));
        assert!(data.has_value("hasDisability", FieldLookup::Flat));
    }

    #[test]
    fn flat_lookup_treats_dotted_name_as_literal_key() {
        let nested = FormData::from_json(json!({"referee1": {"name": "Sam"}})).expect("draft");
        assert_eq!(nested.lookup("referee1.name", FieldLookup::Flat), None);

        let literal = FormData::new().with("referee1.name", "Sam");
        assert_eq!(
            literal.lookup("referee1.name", FieldLookup::Flat),
            Some(&Value::text("Sam"))
        );
    }

    #[test]
    fn nested_lookup_prefers_literal_key_then_traverses() {
        let data = FormData::from_json(json!({
            "referee1.name": "Literal",
            "referee2": {"name": "Nested"},
            "documents": [{"kind": "passport"}],
        }))
        .expect("draft");

        assert_eq!(
            data.lookup("referee1.name", FieldLookup::Nested),
            Some(&Value::text("Literal"))
        );
        assert_eq!(
            data.lookup("referee2.name", FieldLookup::Nested),
            Some(&Value::text("Nested"))
        );
        assert_eq!(
            data.lookup("documents[0].kind", FieldLookup::Nested),
            Some(&Value::text("passport"))
        );
        assert_eq!(data.lookup("referee2.phone", FieldLookup::Nested), None);
        assert_eq!(data.lookup("a..b", FieldLookup::Nested), None);
    }

    #[test]
    fn nested_assign_writes_into_nested_object() {
        let mut data =
            FormData::from_json(json!({"referee1": {"email": "sam@x.io"}})).expect("draft");
        data.assign("referee1.name", "Sam", FieldLookup::Nested);
        data.assign("documents[1].kind", "transcript", FieldLookup::Nested);

        assert_eq!(data.get("referee1.name"), None);
        assert_eq!(
            serde_json::to_value(&data).expect("json"),
            json!({
                "referee1": {"email": "sam@x.io", "name": "Sam"},
                "documents": [null, {"kind": "transcript"}],
            })
        );
        assert!(data.has_value("referee1.name", FieldLookup::Nested));
    }

    #[test]
    fn assign_keeps_literal_keys_when_flat_or_already_present() {
        let mut data = FormData::new().with("referee2.name", "Old");
        data.assign("referee1.name", "Sam", FieldLookup::Flat);
        data.assign("referee2.name", "New", FieldLookup::Nested);
        data.assign("firstName", "Alice", FieldLookup::Nested);

        assert_eq!(data.get("referee1.name"), Some(&Value::text("Sam")));
        assert_eq!(data.get("referee2.name"), Some(&Value::text("New")));
        assert_eq!(data.get("firstName"), Some(&Value::text("Alice")));
        assert_eq!(data.get("referee2"), None);
    }

    #[test]
    fn merge_overwrites_and_appends() {
        let mut draft = FormData::new().with("firstName", "Al").with("country", "NZ");
        draft.merge(FormData::new().with("firstName", "Alice").with("email", "a@x.io"));

        let keys: Vec<&str> = draft.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["firstName", "country", "email"]);
        assert_eq!(draft.get("firstName"), Some(&Value::text("Alice")));
    }
}
