//! Entity instances.

use crate::error::CoreResult;
use crate::schema::Schema;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single entity instance: a schema handle plus a field map.
///
/// All values are strings at the storage boundary; a `None` value is
/// the null placeholder for a declared-but-unset field. Mutating an
/// entity changes only this in-memory copy until it is persisted via
/// [`EntityStore::save`](crate::EntityStore::save).
#[derive(Debug, Clone)]
pub struct Entity {
    schema: Arc<Schema>,
    data: BTreeMap<String, Option<String>>,
}

impl Entity {
    /// Creates an entity over the given field map.
    #[must_use]
    pub fn new(schema: Arc<Schema>, data: BTreeMap<String, Option<String>>) -> Self {
        Self { schema, data }
    }

    /// Returns the schema this entity belongs to.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the entity's id, if the identifier field is populated.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.raw(self.schema.id_field()).and_then(|v| v.parse().ok())
    }

    /// Returns a field value with the schema's read mutator applied,
    /// when one is registered.
    ///
    /// Absent and null fields both return `None`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<String> {
        let value = self.raw(field)?;
        match self.schema.mutator(field) {
            Some(mutator) => Some(mutator(value)),
            None => Some(value.to_string()),
        }
    }

    /// Returns the stored field value, bypassing any mutator.
    #[must_use]
    pub fn raw(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(|v| v.as_deref())
    }

    /// Sets a field value in memory.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.data.insert(field.into(), Some(value.into()));
    }

    /// Clears a field to the null placeholder in memory.
    pub fn clear(&mut self, field: &str) {
        self.data.insert(field.to_string(), None);
    }

    /// Returns a copy of the field map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.data.clone()
    }

    /// Returns a view of the field map.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, Option<String>> {
        &self.data
    }

    /// Serializes the field map to a JSON object string; null fields
    /// become JSON `null`.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.data)?)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.data).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder("user")
                .indexed(["id", "name"])
                .plain(["phone_number"])
                .mutator("phone_number", |v| {
                    if v.len() == 10 {
                        format!("{}-{}-{}", &v[..3], &v[3..6], &v[6..])
                    } else {
                        v.to_string()
                    }
                })
                .build()
                .unwrap(),
        )
    }

    fn entity(pairs: &[(&str, Option<&str>)]) -> Entity {
        let data = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.map(ToString::to_string)))
            .collect();
        Entity::new(schema(), data)
    }

    #[test]
    fn id_parses_identifier_field() {
        let e = entity(&[("id", Some("7")), ("name", Some("Joe"))]);
        assert_eq!(e.id(), Some(7));
    }

    #[test]
    fn id_missing_or_null_is_none() {
        assert_eq!(entity(&[("name", Some("Joe"))]).id(), None);
        assert_eq!(entity(&[("id", None)]).id(), None);
    }

    #[test]
    fn get_applies_mutator_raw_does_not() {
        let e = entity(&[("id", Some("1")), ("phone_number", Some("1231231234"))]);
        assert_eq!(e.get("phone_number").as_deref(), Some("123-123-1234"));
        assert_eq!(e.raw("phone_number"), Some("1231231234"));
    }

    #[test]
    fn get_without_mutator_returns_stored_value() {
        let e = entity(&[("name", Some("Kenyon Haliwell"))]);
        assert_eq!(e.get("name").as_deref(), Some("Kenyon Haliwell"));
    }

    #[test]
    fn null_field_reads_as_none() {
        let e = entity(&[("phone_number", None)]);
        assert_eq!(e.get("phone_number"), None);
        assert_eq!(e.raw("phone_number"), None);
    }

    #[test]
    fn set_and_clear() {
        let mut e = entity(&[("id", Some("1"))]);
        e.set("name", "New Name");
        assert_eq!(e.raw("name"), Some("New Name"));
        e.clear("name");
        assert_eq!(e.raw("name"), None);
    }

    #[test]
    fn json_roundtrip_with_nulls() {
        let e = entity(&[("id", Some("1")), ("name", None)]);
        let json = e.to_json().unwrap();
        assert_eq!(json, r#"{"id":"1","name":null}"#);
        assert_eq!(format!("{e}"), json);
    }
}
