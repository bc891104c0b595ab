//! Result collections.

use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

/// An ordered, index-accessible, countable list of entities.
///
/// Collections are owned by the caller that received them and hold no
/// consistency guarantee about the store's current state; persisting a
/// mutated element writes through via
/// [`EntityStore::save`](crate::EntityStore::save).
#[derive(Debug, Clone, Default)]
pub struct Collection {
    entities: Vec<Entity>,
}

impl Collection {
    /// Creates a collection from an ordered sequence of entities.
    #[must_use]
    pub fn new(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    /// Builds a collection from a JSON value.
    ///
    /// The value must be an array of objects whose members are strings
    /// or null; anything else is an invalid argument.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] for non-array input or
    /// malformed elements.
    pub fn from_value(schema: &Arc<Schema>, value: Value) -> CoreResult<Self> {
        let Value::Array(items) = value else {
            return Err(CoreError::invalid_argument(
                "collection input must be an array of records",
            ));
        };

        let mut entities = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(object) = item else {
                return Err(CoreError::invalid_argument(
                    "collection element must be an object",
                ));
            };
            let mut data = BTreeMap::new();
            for (field, value) in object {
                let value = match value {
                    Value::String(s) => Some(s),
                    Value::Null => None,
                    _ => {
                        return Err(CoreError::invalid_argument(format!(
                            "field '{field}' must be a string or null"
                        )))
                    }
                };
                data.insert(field, value);
            }
            entities.push(Entity::new(Arc::clone(schema), data));
        }

        Ok(Self { entities })
    }

    /// Returns the number of entities in the collection.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of entities in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the collection holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the entity at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Returns a mutable reference to the entity at `index`, if present.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// Returns `true` if `index` is a valid position.
    #[must_use]
    pub fn contains_index(&self, index: usize) -> bool {
        index < self.entities.len()
    }

    /// Appends an entity to the collection.
    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Iterates over the entities in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Iterates mutably over the entities in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        self.entities.iter_mut()
    }

    /// Serializes each entity to its plain field map, preserving order.
    #[must_use]
    pub fn to_values(&self) -> Vec<BTreeMap<String, Option<String>>> {
        self.entities.iter().map(Entity::to_map).collect()
    }

    /// Serializes the collection to a JSON array string.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(&self.to_values())?)
    }
}

impl Index<usize> for Collection {
    type Output = Entity;

    fn index(&self, index: usize) -> &Entity {
        &self.entities[index]
    }
}

impl IndexMut<usize> for Collection {
    fn index_mut(&mut self, index: usize) -> &mut Entity {
        &mut self.entities[index]
    }
}

impl IntoIterator for Collection {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.to_values()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
