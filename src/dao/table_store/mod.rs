/// In-process backend.
pub mod memory;
#[cfg(feature = "postgrest-store")]
/// PostgREST backend.
pub mod postgrest;

use std::{fmt, sync::Arc};

use futures::future::BoxFuture;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::dao::storage::{StorageError, StorageResult};

/// A persisted row as exchanged with the remote store.
pub type Row = Map<String, Value>;

/// Tables of the remote relational store. This is the one fixed schema the service speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Rounds.
    Rounds,
    /// Per-round hole snapshots.
    RoundHoles,
    /// Strokes.
    Strokes,
    /// Bag clubs.
    BagClubs,
    /// Mental elements.
    MentalElements,
    /// User courses.
    UserCourses,
    /// Hole layouts of user courses.
    UserCourseHoles,
    /// Home clubs.
    HomeClubs,
    /// Hole layouts of home clubs.
    HomeClubHoles,
    /// Contact form messages.
    ContactMessages,
    /// Tier interest signups.
    InterestSignups,
}

impl Table {
    /// Table name as the store knows it.
    pub fn name(self) -> &'static str {
        match self {
            Table::Rounds => "rounds",
            Table::RoundHoles => "round_holes",
            Table::Strokes => "strokes",
            Table::BagClubs => "bag_clubs",
            Table::MentalElements => "mental_elements",
            Table::UserCourses => "user_courses",
            Table::UserCourseHoles => "user_course_holes",
            Table::HomeClubs => "home_clubs",
            Table::HomeClubHoles => "home_club_holes",
            Table::ContactMessages => "contact_messages",
            Table::InterestSignups => "interest_signups",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row predicate understood by every backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`.
    Eq(&'static str, Value),
    /// `column` is one of the values.
    In(&'static str, Vec<Value>),
    /// `column >= value`.
    Gte(&'static str, Value),
    /// `column` is null.
    IsNull(&'static str),
    /// `column` is not null.
    NotNull(&'static str),
}

impl Filter {
    /// Equality predicate.
    pub fn eq(column: &'static str, value: impl Serialize) -> Self {
        Filter::Eq(column, to_value(value))
    }

    /// Membership predicate.
    pub fn is_in<T: Serialize>(column: &'static str, values: impl IntoIterator<Item = T>) -> Self {
        Filter::In(column, values.into_iter().map(to_value).collect())
    }

    /// Lower bound predicate.
    pub fn gte(column: &'static str, value: impl Serialize) -> Self {
        Filter::Gte(column, to_value(value))
    }

    /// Column the predicate applies to.
    pub fn column(&self) -> &'static str {
        match self {
            Filter::Eq(column, _)
            | Filter::In(column, _)
            | Filter::Gte(column, _)
            | Filter::IsNull(column)
            | Filter::NotNull(column) => column,
        }
    }
}

/// Ordering clause; nulls sort last in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Column to order by.
    pub column: &'static str,
    /// Ascending when true.
    pub ascending: bool,
}

/// Filter + order + limit, the read shape of the remote store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Predicates combined with AND.
    pub filters: Vec<Filter>,
    /// Ordering clauses in priority order.
    pub order: Vec<Order>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

impl Query {
    /// Unfiltered query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an equality predicate.
    pub fn eq(self, column: &'static str, value: impl Serialize) -> Self {
        self.filter(Filter::eq(column, value))
    }

    /// Order ascending by `column`.
    pub fn asc(mut self, column: &'static str) -> Self {
        self.order.push(Order {
            column,
            ascending: true,
        });
        self
    }

    /// Order descending by `column`.
    pub fn desc(mut self, column: &'static str) -> Self {
        self.order.push(Order {
            column,
            ascending: false,
        });
        self
    }

    /// Cap the number of rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Conflict handling for upserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Columns forming the unique key.
    pub columns: Vec<&'static str>,
    /// Keep existing rows instead of merging.
    pub ignore_duplicates: bool,
}

/// Abstraction over the remote relational store: generic filter/insert/update/delete/upsert verbs.
pub trait TableStore: Send + Sync {
    fn select(&self, table: Table, query: Query) -> BoxFuture<'static, StorageResult<Vec<Row>>>;
    fn insert(&self, table: Table, rows: Vec<Row>) -> BoxFuture<'static, StorageResult<Vec<Row>>>;
    fn upsert(
        &self,
        table: Table,
        rows: Vec<Row>,
        conflict: Conflict,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>>;
    /// Apply `patch` to every row matching `filters`, returning the updated rows.
    fn update(
        &self,
        table: Table,
        filters: Vec<Filter>,
        patch: Row,
    ) -> BoxFuture<'static, StorageResult<Vec<Row>>>;
    /// Delete every row matching `filters`, returning the deleted rows.
    fn delete(&self, table: Table, filters: Vec<Filter>)
    -> BoxFuture<'static, StorageResult<Vec<Row>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Resolve an access token to the authenticated user, `None` when the token is not valid.
    fn resolve_user(&self, access_token: &str) -> BoxFuture<'static, StorageResult<Option<Uuid>>>;
    /// Store handle whose requests carry the given session token.
    fn scoped(&self, access_token: &str) -> Arc<dyn TableStore>;
}

fn to_value(value: impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// Convert a typed record into a row.
pub fn to_row<T: Serialize>(table: Table, record: &T) -> StorageResult<Row> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StorageError::query(format!(
            "`{table}` row must be an object, got {other}"
        ))),
        Err(source) => Err(StorageError::Decode {
            table: table.name(),
            source,
        }),
    }
}

/// Convert rows returned by the store into typed records.
pub fn from_rows<T: DeserializeOwned>(table: Table, rows: Vec<Row>) -> StorageResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|source| StorageError::Decode {
                table: table.name(),
                source,
            })
        })
        .collect()
}

/// Build a patch row from `(column, value)` pairs.
pub fn patch<const N: usize>(fields: [(&str, Value); N]) -> Row {
    fields
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}
