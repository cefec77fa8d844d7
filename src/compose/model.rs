//! Opaque record values bound into templates.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// A record whose named properties fill placeholder tags.
///
/// Property lookup ignores ASCII case. Strings are written as-is, `null`
/// counts as missing and every other value is written as its JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model(Value);

impl Model {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self)
    }

    /// Convert a slice of records for a repeater.
    pub fn records<T: Serialize>(items: &[T]) -> Result<Vec<Model>, serde_json::Error> {
        items.iter().map(Model::from_serialize).collect()
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.0)
    }

    /// Printable value of a property, matched case-insensitively.
    pub fn property(&self, name: &str) -> Option<Cow<'_, str>> {
        let Value::Object(map) = &self.0 else {
            return None;
        };
        let value = map.get(name).or_else(|| {
            map.iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })?;
        match value {
            Value::Null => None,
            Value::String(text) => Some(Cow::Borrowed(text.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

impl From<Value> for Model {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Product {
        name: String,
        price: f64,
    }

    #[test]
    fn test_property_lookup_ignores_case() {
        let model = Model::new(json!({"Title": "Hello", "count": 3, "gone": null}));
        assert_eq!(model.property("title").as_deref(), Some("Hello"));
        assert_eq!(model.property("TITLE").as_deref(), Some("Hello"));
        assert_eq!(model.property("Count").as_deref(), Some("3"));
        assert_eq!(model.property("gone"), None);
        assert_eq!(model.property("absent"), None);
    }

    #[test]
    fn test_non_object_has_no_properties() {
        assert_eq!(Model::new(json!("text")).property("len"), None);
        assert_eq!(Model::default().property("x"), None);
    }

    #[test]
    fn test_records_from_serializable() {
        let products = vec![
            Product { name: "Anvil".into(), price: 9.5 },
            Product { name: "Rope".into(), price: 2.0 },
        ];
        let records = Model::records(&products).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].property("NAME").as_deref(), Some("Rope"));
        assert_eq!(records[0].deserialize::<Product>().unwrap(), products[0]);
    }
}
