//! In-process [`TableStore`] used for tests and local development.
//!
//! Evaluates the same filter/order/limit queries the remote store understands and
//! enforces the handful of unique keys the schema declares.

use std::{cmp::Ordering, sync::Arc};

use dashmap::DashMap;
use futures::future::BoxFuture;
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::dao::{
    storage::{StorageError, StorageResult},
    table_store::{Conflict, Filter, Order, Query, Row, Table, TableStore},
};

/// Store verbs that can be armed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Reads.
    Select,
    /// Inserts and upserts.
    Insert,
    /// Patches.
    Update,
    /// Deletes.
    Delete,
}

#[derive(Debug, Clone)]
struct ArmedFailure {
    remaining_ok: usize,
    message: String,
}

#[derive(Default)]
struct Inner {
    tables: DashMap<Table, Vec<Row>>,
    tokens: DashMap<String, Uuid>,
    failures: DashMap<(Table, Verb), ArmedFailure>,
}

#[derive(Clone, Default)]
/// In-process [`TableStore`] for tests and local runs.
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Empty store with no registered sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as a session for `user_id`.
    pub fn register_token(&self, token: impl Into<String>, user_id: Uuid) {
        self.inner.tokens.insert(token.into(), user_id);
    }

    /// Make the `(table, verb)` call after `remaining_ok` successful ones fail with `message`.
    pub fn fail_after(&self, table: Table, verb: Verb, remaining_ok: usize, message: &str) {
        self.inner.failures.insert(
            (table, verb),
            ArmedFailure {
                remaining_ok,
                message: message.to_string(),
            },
        );
    }

    /// Copy of every row currently stored in `table`.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.inner
            .tables
            .get(&table)
            .map(|rows| rows.clone())
            .unwrap_or_default()
    }

    fn check_failure(&self, table: Table, verb: Verb) -> StorageResult<()> {
        let Some(mut armed) = self.inner.failures.get_mut(&(table, verb)) else {
            return Ok(());
        };
        if armed.remaining_ok > 0 {
            armed.remaining_ok -= 1;
            return Ok(());
        }
        let message = armed.message.clone();
        drop(armed);
        self.inner.failures.remove(&(table, verb));
        Err(StorageError::query(message))
    }

    fn run_select(&self, table: Table, query: &Query) -> StorageResult<Vec<Row>> {
        self.check_failure(table, Verb::Select)?;
        let mut rows: Vec<Row> = self
            .inner
            .tables
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        rows.sort_by(|a, b| compare_rows(a, b, &query.order));
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn run_insert(&self, table: Table, rows: Vec<Row>) -> StorageResult<Vec<Row>> {
        self.check_failure(table, Verb::Insert)?;
        let mut stored = self.inner.tables.entry(table).or_default();
        let keys = unique_keys(table);

        // Validate the whole batch before writing so a rejected insert leaves no rows behind.
        for (index, row) in rows.iter().enumerate() {
            for key in keys {
                let clash_existing = stored.iter().any(|existing| same_key(existing, row, key));
                let clash_batch = rows[..index].iter().any(|other| same_key(other, row, key));
                if clash_existing || clash_batch {
                    return Err(duplicate_error(table, key));
                }
            }
        }

        stored.extend(rows.iter().cloned());
        Ok(rows)
    }

    fn run_upsert(&self, table: Table, rows: Vec<Row>, conflict: &Conflict) -> StorageResult<Vec<Row>> {
        self.check_failure(table, Verb::Insert)?;
        let mut stored = self.inner.tables.entry(table).or_default();
        let mut written = Vec::with_capacity(rows.len());

        for row in rows {
            let existing = stored
                .iter_mut()
                .find(|existing| same_key(existing, &row, &conflict.columns));
            match existing {
                Some(_) if conflict.ignore_duplicates => {}
                Some(existing) => {
                    existing.extend(row.clone());
                    written.push(existing.clone());
                }
                None => {
                    stored.push(row.clone());
                    written.push(row);
                }
            }
        }

        Ok(written)
    }

    fn run_update(&self, table: Table, filters: &[Filter], patch: &Row) -> StorageResult<Vec<Row>> {
        self.check_failure(table, Verb::Update)?;
        let Some(mut stored) = self.inner.tables.get_mut(&table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in stored.iter_mut().filter(|row| matches_all(row, filters)) {
            row.extend(patch.clone());
            updated.push(row.clone());
        }
        Ok(updated)
    }

    fn run_delete(&self, table: Table, filters: &[Filter]) -> StorageResult<Vec<Row>> {
        self.check_failure(table, Verb::Delete)?;
        let Some(mut stored) = self.inner.tables.get_mut(&table) else {
            return Ok(Vec::new());
        };

        let (deleted, kept): (Vec<Row>, Vec<Row>) =
            stored.drain(..).partition(|row| matches_all(row, filters));
        *stored = kept;
        Ok(deleted)
    }
}

impl TableStore for MemoryStore {
    fn select(&self, table: Table, query: Query) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let result = self.run_select(table, &query);
        Box::pin(async move { result })
    }

    fn insert(&self, table: Table, rows: Vec<Row>) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let result = self.run_insert(table, rows);
        Box::pin(async move { result })
    }

    fn upsert(
        &self,
        table: Table,
        rows: Vec<Row>,
        conflict: Conflict,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let result = self.run_upsert(table, rows, &conflict);
        Box::pin(async move { result })
    }

    fn update(
        &self,
        table: Table,
        filters: Vec<Filter>,
        patch: Row,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let result = self.run_update(table, &filters, &patch);
        Box::pin(async move { result })
    }

    fn delete(
        &self,
        table: Table,
        filters: Vec<Filter>,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>> {
        let result = self.run_delete(table, &filters);
        Box::pin(async move { result })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn resolve_user(&self, access_token: &str) -> BoxFuture<'static, StorageResult<Option<Uuid>>> {
        let user = self.inner.tokens.get(access_token).map(|entry| *entry);
        Box::pin(async move { Ok(user) })
    }

    fn scoped(&self, _access_token: &str) -> Arc<dyn TableStore> {
        Arc::new(self.clone())
    }
}

fn unique_keys(table: Table) -> &'static [&'static [&'static str]] {
    match table {
        Table::BagClubs | Table::MentalElements => &[&["user_id", "label"]],
        Table::RoundHoles => &[&["round_id", "hole_number"]],
        Table::UserCourseHoles => &[&["user_course_id", "hole_number"]],
        Table::HomeClubHoles => &[&["home_club_id", "hole_number"]],
        Table::HomeClubs => &[&["user_id"]],
        _ => &[],
    }
}

fn duplicate_error(table: Table, key: &[&str]) -> StorageError {
    StorageError::query(format!(
        "duplicate key value violates unique constraint \"{}_{}_key\"",
        table.name(),
        key.join("_")
    ))
}

fn same_key(a: &Row, b: &Row, columns: &[&str]) -> bool {
    !columns.is_empty()
        && columns
            .iter()
            .all(|column| a.get(*column).is_some() && a.get(*column) == b.get(*column))
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| matches(row, filter))
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let cell = row.get(filter.column()).unwrap_or(&Value::Null);
    match filter {
        Filter::Eq(_, expected) => values_equal(cell, expected),
        Filter::In(_, candidates) => candidates.iter().any(|c| values_equal(cell, c)),
        Filter::Gte(_, bound) => {
            !cell.is_null() && compare_values(cell, bound) != Ordering::Less
        }
        Filter::IsNull(_) => cell.is_null(),
        Filter::NotNull(_) => !cell.is_null(),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn compare_rows(a: &Row, b: &Row, order: &[Order]) -> Ordering {
    for clause in order {
        let left = a.get(clause.column).unwrap_or(&Value::Null);
        let right = b.get(clause.column).unwrap_or(&Value::Null);
        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) if clause.ascending => compare_values(left, right),
            (false, false) => compare_values(right, left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) => {
            match (
                OffsetDateTime::parse(x, &Rfc3339),
                OffsetDateTime::parse(y, &Rfc3339),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        _ => Ordering::Equal,
    }
}
