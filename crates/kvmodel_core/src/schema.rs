//! Entity schema descriptors.
//!
//! A [`Schema`] declares, per entity kind, the ordered indexed fields
//! (the first is always the unique identifier), the plain fields, the
//! hidden subset, and optional per-field read mutators. Schemas replace
//! runtime name-based dispatch: everything is resolved when the schema
//! is built, and misconfiguration fails there, not at first use.

use crate::error::{CoreError, CoreResult};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A read mutator applied to a field's stored value.
type Mutator = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Which fields a read should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSelection {
    /// All declared fields.
    All,
    /// The named fields. The identifier field is always included even
    /// when not named.
    Named(Vec<String>),
}

impl FieldSelection {
    /// Convenience constructor for a named selection.
    pub fn named<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Named(fields.into_iter().map(Into::into).collect())
    }
}

/// Field layout for one entity kind.
///
/// The indexed-field order is significant and fixed: index keys encode
/// values in declared order, so changing the order after data exists
/// makes old index entries unfindable (schema migration is out of
/// scope).
pub struct Schema {
    kind: String,
    indexed: Vec<String>,
    plain: Vec<String>,
    hidden: BTreeSet<String>,
    mutators: BTreeMap<String, Mutator>,
}

impl Schema {
    /// Starts building a schema for the given entity kind.
    ///
    /// The kind is lower-cased; it becomes the key prefix for hash
    /// records and index entries.
    #[must_use]
    pub fn builder(kind: &str) -> SchemaBuilder {
        SchemaBuilder {
            kind: kind.to_lowercase(),
            indexed: Vec::new(),
            plain: Vec::new(),
            hidden: Vec::new(),
            mutators: BTreeMap::new(),
        }
    }

    /// Returns the entity kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the identifier field (the first indexed field).
    #[must_use]
    pub fn id_field(&self) -> &str {
        &self.indexed[0]
    }

    /// Returns the indexed fields in declared order.
    #[must_use]
    pub fn indexed_fields(&self) -> &[String] {
        &self.indexed
    }

    /// Returns all declared fields: indexed first, then plain, in
    /// declared order.
    #[must_use]
    pub fn all_fields(&self) -> Vec<String> {
        self.indexed.iter().chain(self.plain.iter()).cloned().collect()
    }

    /// Returns `true` if the field is declared (indexed or plain).
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.indexed.iter().any(|f| f == field) || self.plain.iter().any(|f| f == field)
    }

    /// Returns `true` if the field is part of the index encoding.
    #[must_use]
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexed.iter().any(|f| f == field)
    }

    /// Returns `true` if the field is excluded from default reads.
    #[must_use]
    pub fn is_hidden(&self, field: &str) -> bool {
        self.hidden.contains(field)
    }

    /// Returns the read mutator registered for a field, if any.
    #[must_use]
    pub fn mutator(&self, field: &str) -> Option<&(dyn Fn(&str) -> String + Send + Sync)> {
        self.mutators.get(field).map(|m| &**m)
    }

    /// Resolves a field selection into the concrete list of fields a
    /// read should request.
    ///
    /// The identifier field is always forced into named selections.
    /// Hidden fields are removed from the default (`All`) expansion
    /// unless `guard_hidden` is false (used internally when the index
    /// encoding depends on hidden fields); naming a hidden field
    /// explicitly always returns it.
    #[must_use]
    pub fn fields_for_get(&self, selection: &FieldSelection, guard_hidden: bool) -> Vec<String> {
        match selection {
            FieldSelection::All => {
                let mut fields = self.all_fields();
                if guard_hidden {
                    fields.retain(|f| !self.hidden.contains(f));
                }
                fields
            }
            FieldSelection::Named(named) => {
                let mut fields: Vec<String> = named.clone();
                if !fields.iter().any(|f| f == self.id_field()) {
                    fields.push(self.id_field().to_string());
                }
                fields
            }
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("kind", &self.kind)
            .field("indexed", &self.indexed)
            .field("plain", &self.plain)
            .field("hidden", &self.hidden)
            .field("mutators", &self.mutators.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder {
    kind: String,
    indexed: Vec<String>,
    plain: Vec<String>,
    hidden: Vec<String>,
    mutators: BTreeMap<String, Mutator>,
}

impl SchemaBuilder {
    /// Declares the indexed fields, in index-encoding order.
    ///
    /// The first indexed field is the unique identifier and must hold
    /// the allocated integer id.
    #[must_use]
    pub fn indexed<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexed.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Declares additional fields that do not participate in the index.
    #[must_use]
    pub fn plain<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plain.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Marks fields as hidden: excluded from reads unless explicitly
    /// requested by name.
    #[must_use]
    pub fn hidden<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Registers a read mutator for a field.
    ///
    /// The mutator transforms the stored value on mutated reads
    /// ([`Entity::get`](crate::Entity::get)); the raw accessor bypasses
    /// it.
    #[must_use]
    pub fn mutator<F>(mut self, field: &str, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.mutators.insert(field.to_string(), Box::new(f));
        self
    }

    /// Validates the declarations and builds the schema.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Contract`] when:
    /// - no indexed field is declared (there must be an identifier)
    /// - a field name is declared twice
    /// - a hidden field or mutator target is not a declared field
    /// - the identifier field is marked hidden
    pub fn build(self) -> CoreResult<Schema> {
        if self.indexed.is_empty() {
            return Err(CoreError::contract(format!(
                "kind '{}' declares no indexed fields; the first indexed field is the identifier",
                self.kind
            )));
        }

        let mut seen = BTreeSet::new();
        for field in self.indexed.iter().chain(self.plain.iter()) {
            if !seen.insert(field.clone()) {
                return Err(CoreError::contract(format!(
                    "field '{field}' declared more than once on kind '{}'",
                    self.kind
                )));
            }
        }

        for field in &self.hidden {
            if !seen.contains(field) {
                return Err(CoreError::contract(format!(
                    "hidden field '{field}' is not declared on kind '{}'",
                    self.kind
                )));
            }
        }
        if self.hidden.iter().any(|f| f == &self.indexed[0]) {
            return Err(CoreError::contract(format!(
                "identifier field '{}' cannot be hidden",
                self.indexed[0]
            )));
        }

        for field in self.mutators.keys() {
            if !seen.contains(field) {
                return Err(CoreError::contract(format!(
                    "mutator target '{field}' is not declared on kind '{}'",
                    self.kind
                )));
            }
        }

        Ok(Schema {
            kind: self.kind,
            indexed: self.indexed,
            plain: self.plain,
            hidden: self.hidden.into_iter().collect(),
            mutators: self.mutators,
        })
    }
}
