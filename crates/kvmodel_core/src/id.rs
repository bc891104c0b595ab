//! Per-kind id allocation.
//!
//! Ids are monotonically increasing integers, one counter per entity
//! kind, stored under the counter key (`{kind}s`). Allocation is a
//! single atomic increment on the store, so concurrent creators can
//! never observe the same id. Ids are never reused, including after
//! deletes.

use crate::error::CoreResult;
use crate::key::counter_key;
use crate::schema::Schema;
use kvmodel_store::StoreClient;

/// Allocates the next id for the schema's kind.
///
/// The counter is created lazily: a missing counter reads as 0, so the
/// first allocation returns 1.
pub fn next_id<C: StoreClient + ?Sized>(client: &C, schema: &Schema) -> CoreResult<u64> {
    Ok(client.incr(&counter_key(schema.kind()))?)
}
