//! User-scoped labelled lists kept in a dense `sort_order`: bag clubs and mental elements.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    dao::{
        models::{BagClubEntity, MentalElementEntity},
        storage::StorageResult,
        table_store::{Filter, Query, Table, TableStore, from_rows, patch, to_row},
    },
    domain::sequence::Ordinal,
    state::session::Session,
};

/// Record stored in an ordered, per-user list.
pub trait OrderedRecord: Serialize + DeserializeOwned + Send {
    const TABLE: Table;

    fn id(&self) -> Uuid;
    fn sort_order(&self) -> u32;

    fn ordinal(&self) -> Ordinal {
        Ordinal {
            id: self.id(),
            sort_order: self.sort_order(),
        }
    }
}

impl OrderedRecord for BagClubEntity {
    const TABLE: Table = Table::BagClubs;

    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }
}

impl OrderedRecord for MentalElementEntity {
    const TABLE: Table = Table::MentalElements;

    fn id(&self) -> Uuid {
        self.id
    }

    fn sort_order(&self) -> u32 {
        self.sort_order
    }
}

/// Repository over one ordered list of the session user.
pub struct OrderedRepository<'a, T> {
    session: &'a Session,
    _record: PhantomData<T>,
}

impl<'a, T: OrderedRecord> OrderedRepository<'a, T> {
    /// Repository bound to `session`.
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            _record: PhantomData,
        }
    }

    fn store(&self) -> &dyn TableStore {
        self.session.store()
    }

    fn owned_filters(&self, id: Uuid) -> Vec<Filter> {
        vec![
            Filter::eq("id", id),
            Filter::eq("user_id", self.session.user_id()),
        ]
    }

    /// Items in display order.
    pub async fn list(&self) -> StorageResult<Vec<T>> {
        let query = Query::new()
            .eq("user_id", self.session.user_id())
            .asc("sort_order");
        let rows = self.store().select(T::TABLE, query).await?;
        from_rows(T::TABLE, rows)
    }

    /// `sort_order` a newly appended item receives.
    pub async fn next_sort_order(&self) -> StorageResult<u32> {
        let query = Query::new()
            .eq("user_id", self.session.user_id())
            .desc("sort_order")
            .limit(1);
        let rows = self.store().select(T::TABLE, query).await?;
        let last: Option<T> = from_rows(T::TABLE, rows)?.into_iter().next();
        Ok(last.map(|item| item.sort_order()).unwrap_or(0) + 1)
    }

    /// Insert one item.
    pub async fn insert(&self, item: &T) -> StorageResult<()> {
        let row = to_row(T::TABLE, item)?;
        self.store().insert(T::TABLE, vec![row]).await?;
        Ok(())
    }

    /// Delete one item, returning whether it existed.
    pub async fn delete(&self, id: Uuid) -> StorageResult<bool> {
        let deleted = self.store().delete(T::TABLE, self.owned_filters(id)).await?;
        Ok(!deleted.is_empty())
    }

    /// Rewrite the `sort_order` of one owned item.
    pub async fn set_sort_order(&self, id: Uuid, sort_order: u32) -> StorageResult<()> {
        self.store()
            .update(
                T::TABLE,
                self.owned_filters(id),
                patch([("sort_order", Value::from(sort_order))]),
            )
            .await?;
        Ok(())
    }
}

impl OrderedRepository<'_, BagClubEntity> {
    /// Replace the club's best stroke memory note, returning whether the club exists.
    pub async fn set_bsm(&self, id: Uuid, bsm: Option<String>) -> StorageResult<bool> {
        let value = bsm.map(Value::String).unwrap_or(Value::Null);
        let updated = self
            .store()
            .update(BagClubEntity::TABLE, self.owned_filters(id), patch([("bsm", value)]))
            .await?;
        Ok(!updated.is_empty())
    }
}
