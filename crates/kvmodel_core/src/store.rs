//! Entity store: CRUD with secondary-index consistency.

use crate::collection::Collection;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::id;
use crate::key::{self, Wildcard};
use crate::scan::{scan_keys, DEFAULT_SCAN_BATCH};
use crate::schema::{FieldSelection, Schema};
use kvmodel_store::{StoreClient, StoreError};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a secondary-index search, shaped by match cardinality.
///
/// Zero matches, a single entity, and multiple entities are distinct
/// states; call sites match on the variant instead of branching on a
/// dynamic type. [`SearchOutcome::into_collection`] gives the uniform
/// view when shaping does not matter.
#[derive(Debug)]
pub enum SearchOutcome {
    /// No entity matched.
    Empty,
    /// Exactly one entity matched.
    One(Entity),
    /// Two or more entities matched.
    Many(Collection),
}

impl SearchOutcome {
    /// Returns the number of matched entities.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::One(_) => 1,
            Self::Many(collection) => collection.count(),
        }
    }

    /// Returns `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Collapses the outcome into a collection of size 0, 1, or n.
    #[must_use]
    pub fn into_collection(self) -> Collection {
        match self {
            Self::Empty => Collection::default(),
            Self::One(entity) => Collection::new(vec![entity]),
            Self::Many(collection) => collection,
        }
    }
}

/// Record-style CRUD over a remote key-value store for one entity kind.
///
/// The store owns an injected [`StoreClient`] and a [`Schema`]. Every
/// operation issues sequential blocking calls against the client; there
/// are no multi-key transactions, so the multi-step sequences in
/// `create`, `update`, and `delete` are not atomic. The hash record is
/// the source of truth; the index entry is derived, and faults in its
/// maintenance are repaired or logged rather than raised.
pub struct EntityStore<C: StoreClient> {
    client: C,
    schema: Arc<Schema>,
}

impl<C: StoreClient> EntityStore<C> {
    /// Creates a store for the schema's kind over the given client.
    pub fn new(client: C, schema: Schema) -> Self {
        Self {
            client,
            schema: Arc::new(schema),
        }
    }

    /// Returns the schema this store operates on.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the underlying store client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Reads an entity by id.
    ///
    /// The requested field set defaults to all declared fields, always
    /// includes the identifier field, and excludes hidden fields unless
    /// they are named explicitly. Returns `None` when no record exists.
    pub fn get(&self, id: u64, selection: FieldSelection) -> CoreResult<Option<Entity>> {
        self.read(id, &selection, true)
    }

    /// Reads an entity by id, raising [`CoreError::NotFound`] when
    /// absent.
    pub fn get_or_fail(&self, id: u64, selection: FieldSelection) -> CoreResult<Entity> {
        self.get(id, selection)?
            .ok_or_else(|| CoreError::not_found(self.schema.kind(), id))
    }

    /// Searches by exact indexed-field values.
    ///
    /// Literal `*` characters in the criteria are stripped, so a value
    /// containing a wildcard matches nothing rather than everything
    /// with that prefix.
    pub fn search_by(
        &self,
        criteria: &BTreeMap<String, String>,
        selection: FieldSelection,
    ) -> CoreResult<SearchOutcome> {
        self.search(criteria, selection, Wildcard::Strip)
    }

    /// Searches by indexed-field values, honoring `*` wildcards.
    pub fn search_by_wildcard(
        &self,
        criteria: &BTreeMap<String, String>,
        selection: FieldSelection,
    ) -> CoreResult<SearchOutcome> {
        self.search(criteria, selection, Wildcard::Allow)
    }

    fn search(
        &self,
        criteria: &BTreeMap<String, String>,
        selection: FieldSelection,
        wildcard: Wildcard,
    ) -> CoreResult<SearchOutcome> {
        let pattern = key::search_pattern(&self.schema, criteria, wildcard)?;
        let keys = scan_keys(&self.client, &pattern, DEFAULT_SCAN_BATCH)?;
        debug!(pattern, matches = keys.len(), "index search");

        let mut found = Vec::with_capacity(keys.len());
        for index_key in keys {
            let Some(id) = key::id_from_index_key(&index_key) else {
                warn!(key = %index_key, "malformed index key, skipping");
                continue;
            };
            match self.get(id, selection.clone())? {
                Some(entity) => found.push(entity),
                // The hash vanished under the index entry (orphan), or
                // was deleted mid-scan.
                None => warn!(key = %index_key, id, "index entry without hash record, skipping"),
            }
        }

        Ok(match found.len() {
            0 => SearchOutcome::Empty,
            1 => SearchOutcome::One(found.remove(0)),
            _ => SearchOutcome::Many(Collection::new(found)),
        })
    }

    /// Creates a new entity.
    ///
    /// Every declared field absent from `values` starts as the null
    /// placeholder; caller values win. A fresh id is allocated, the
    /// hash record is written, then the index entry. The two writes are
    /// not atomic; a crash in between leaves a record without an index
    /// entry until the next update repairs it.
    pub fn create(&self, values: &BTreeMap<String, String>) -> CoreResult<Entity> {
        self.check_declared(values.keys())?;

        let mut data: BTreeMap<String, Option<String>> = self
            .schema
            .all_fields()
            .into_iter()
            .map(|field| (field, None))
            .collect();
        for (field, value) in values {
            // Empty caller values collapse to the null placeholder, the
            // same way they would after a write-and-reload.
            let value = Some(value.clone()).filter(|v| !v.is_empty());
            data.insert(field.clone(), value);
        }

        let id = id::next_id(&self.client, &self.schema)?;
        data.insert(self.schema.id_field().to_string(), Some(id.to_string()));

        let pairs: Vec<(String, String)> = data
            .iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field.clone(), v.clone())))
            .collect();
        self.client
            .hash_set(&key::hash_key(self.schema.kind(), id), &pairs)?;

        self.client
            .set(&key::index_key(&self.schema, id, &data), &id.to_string())?;

        debug!(kind = self.schema.kind(), id, "created entity");
        Ok(Entity::new(Arc::clone(&self.schema), data))
    }

    /// Updates fields of an existing entity, repositioning the index
    /// entry when an indexed value changes.
    ///
    /// Reads the full unguarded record first (the index encoding may
    /// depend on hidden fields), computes old and new index keys, and
    /// renames the entry when they differ before writing the changed
    /// fields. A missing old index entry is a consistency fault: it is
    /// logged and the new entry is written fresh, since the hash record
    /// is the source of truth.
    ///
    /// An empty-string change value is the null encoding: it clears the
    /// field, which then reads back as null.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] when no record exists, and
    /// [`CoreError::InvalidArgument`] when `changes` touches the
    /// identifier field or an undeclared field.
    pub fn update(&self, id: u64, changes: &BTreeMap<String, String>) -> CoreResult<()> {
        self.check_declared(changes.keys())?;
        if changes.contains_key(self.schema.id_field()) {
            return Err(CoreError::invalid_argument(format!(
                "identifier field '{}' is immutable",
                self.schema.id_field()
            )));
        }

        let current = self
            .read(id, &FieldSelection::All, false)?
            .ok_or_else(|| CoreError::not_found(self.schema.kind(), id))?;

        let old_data = current.to_map();
        let mut merged = old_data.clone();
        for (field, value) in changes {
            merged.insert(field.clone(), Some(value.clone()));
        }

        let old_key = key::index_key(&self.schema, id, &old_data);
        let new_key = key::index_key(&self.schema, id, &merged);
        if old_key != new_key {
            match self.client.rename(&old_key, &new_key) {
                Ok(()) => {}
                Err(StoreError::NoSuchKey { .. }) => {
                    warn!(old = %old_key, new = %new_key, "index entry missing on rename, rewriting");
                    self.client.set(&new_key, &id.to_string())?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let pairs: Vec<(String, String)> = changes
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        self.client
            .hash_set(&key::hash_key(self.schema.kind(), id), &pairs)?;

        debug!(kind = self.schema.kind(), id, "updated entity");
        Ok(())
    }

    /// Persists an entity's current field values, cleared fields
    /// included.
    ///
    /// A field cleared to the null placeholder is written as the empty
    /// string, which is the same encoding the index key uses for an
    /// absent value; it reads back as null. The hash protocol has no
    /// per-field delete, so this is the only way a clear can reach the
    /// wire.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] when the entity has no
    /// identifier value.
    pub fn save(&self, entity: &Entity) -> CoreResult<()> {
        let id = entity.id().ok_or_else(|| {
            CoreError::invalid_argument("cannot save an entity without an identifier")
        })?;

        let changes: BTreeMap<String, String> = entity
            .fields()
            .iter()
            .filter(|(field, _)| field.as_str() != self.schema.id_field())
            .map(|(field, value)| (field.clone(), value.clone().unwrap_or_default()))
            .collect();
        self.update(id, &changes)
    }

    /// Deletes an entity and its index entry.
    ///
    /// Reloads the full unguarded record first to recompute the exact
    /// index key. The hash delete and the index delete are independent
    /// operations; a crash between them can leave a dangling index
    /// entry (known risk, repaired lazily by searches that skip
    /// orphans).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotFound`] when no record exists.
    pub fn delete(&self, id: u64) -> CoreResult<()> {
        let current = self
            .read(id, &FieldSelection::All, false)?
            .ok_or_else(|| CoreError::not_found(self.schema.kind(), id))?;

        self.client.delete(&key::hash_key(self.schema.kind(), id))?;

        let index_key = key::index_key(&self.schema, id, &current.to_map());
        if !self.client.delete(&index_key)? {
            warn!(key = %index_key, "index entry already absent on delete");
        }

        debug!(kind = self.schema.kind(), id, "deleted entity");
        Ok(())
    }

    /// Deletes the entity identified by `entity`'s own identifier
    /// field. A silent no-op when the identifier is absent.
    pub fn delete_entity(&self, entity: &Entity) -> CoreResult<()> {
        match entity.id() {
            Some(id) => self.delete(id),
            None => Ok(()),
        }
    }

    fn read(
        &self,
        id: u64,
        selection: &FieldSelection,
        guard_hidden: bool,
    ) -> CoreResult<Option<Entity>> {
        let fields = self.schema.fields_for_get(selection, guard_hidden);
        let values = self
            .client
            .hash_get(&key::hash_key(self.schema.kind(), id), &fields)?;

        let id_field = self.schema.id_field();
        let id_slot = fields.iter().position(|f| f == id_field);
        let exists = id_slot.is_some_and(|slot| values[slot].is_some());
        if !exists {
            return Ok(None);
        }

        // The empty string is the wire encoding of the null
        // placeholder; decode it back so round trips are exact.
        let data = fields
            .into_iter()
            .zip(values)
            .map(|(field, value)| (field, value.filter(|v| !v.is_empty())))
            .collect();
        Ok(Some(Entity::new(Arc::clone(&self.schema), data)))
    }

    fn check_declared<'a, I>(&self, fields: I) -> CoreResult<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for field in fields {
            if !self.schema.has_field(field) {
                return Err(CoreError::invalid_argument(format!(
                    "field '{field}' is not declared on kind '{}'",
                    self.schema.kind()
                )));
            }
        }
        Ok(())
    }
}

impl<C: StoreClient> std::fmt::Debug for EntityStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &self.schema.kind())
            .finish_non_exhaustive()
    }
}
