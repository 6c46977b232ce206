use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use uuid::Uuid;

use crate::{
    dao::{
        models::{RoundEntity, RoundHoleEntity},
        storage::{StorageError, StorageResult},
        table_store::{Conflict, Filter, Query, Row, Table, TableStore, from_rows, patch, to_row},
    },
    domain::round::RoundStatus,
    state::session::Session,
};

/// Course selector of the history view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseScope {
    /// Rounds played on the home club layout.
    Home,
    Course(Uuid),
}

/// Rounds and their per-hole snapshots, always filtered by the session user.
pub struct RoundRepository<'a> {
    session: &'a Session,
}

impl<'a> RoundRepository<'a> {
    /// Repository bound to `session`.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn store(&self) -> &dyn TableStore {
        self.session.store()
    }

    fn owned(&self) -> Query {
        Query::new().eq("user_id", self.session.user_id())
    }

    /// Most recently started active round of the user.
    pub async fn find_active(&self) -> StorageResult<Option<RoundEntity>> {
        let query = self
            .owned()
            .eq("status", RoundStatus::Active)
            .desc("started_at")
            .limit(1);
        let rows = self.store().select(Table::Rounds, query).await?;
        Ok(from_rows(Table::Rounds, rows)?.into_iter().next())
    }

    /// Round by id, owned by the session user.
    pub async fn find(&self, round_id: Uuid) -> StorageResult<Option<RoundEntity>> {
        let query = self.owned().eq("id", round_id).limit(1);
        let rows = self.store().select(Table::Rounds, query).await?;
        Ok(from_rows(Table::Rounds, rows)?.into_iter().next())
    }

    /// Insert a new round row.
    pub async fn insert(&self, round: &RoundEntity) -> StorageResult<()> {
        let row = to_row(Table::Rounds, round)?;
        self.store().insert(Table::Rounds, vec![row]).await?;
        Ok(())
    }

    /// Move the round to another hole.
    pub async fn set_current_hole(&self, round_id: Uuid, hole_number: u32) -> StorageResult<()> {
        self.update_round(
            round_id,
            patch([("current_hole_number", Value::from(hole_number))]),
        )
        .await
    }

    /// Mark the round complete at `at`.
    pub async fn mark_complete(&self, round_id: Uuid, at: OffsetDateTime) -> StorageResult<()> {
        let completed_at = at
            .format(&Rfc3339)
            .map_err(|err| StorageError::query(format!("invalid completion time: {err}")))?;
        self.update_round(
            round_id,
            patch([
                ("status", Value::from(RoundStatus::Complete.as_str())),
                ("completed_at", Value::from(completed_at)),
            ]),
        )
        .await
    }

    async fn update_round(&self, round_id: Uuid, changes: Row) -> StorageResult<()> {
        let filters = vec![
            Filter::eq("id", round_id),
            Filter::eq("user_id", self.session.user_id()),
        ];
        self.store().update(Table::Rounds, filters, changes).await?;
        Ok(())
    }

    /// Delete the round row.
    pub async fn delete(&self, round_id: Uuid) -> StorageResult<()> {
        let filters = vec![
            Filter::eq("id", round_id),
            Filter::eq("user_id", self.session.user_id()),
        ];
        self.store().delete(Table::Rounds, filters).await?;
        Ok(())
    }

    /// Completed rounds, newest completion first.
    pub async fn list_completed(
        &self,
        since: Option<OffsetDateTime>,
        scope: Option<CourseScope>,
        limit: usize,
    ) -> StorageResult<Vec<RoundEntity>> {
        let mut query = self
            .owned()
            .eq("status", RoundStatus::Complete)
            .filter(Filter::NotNull("completed_at"));

        if let Some(since) = since {
            let bound = since
                .format(&Rfc3339)
                .map_err(|err| StorageError::query(format!("invalid range bound: {err}")))?;
            query = query.filter(Filter::gte("completed_at", bound));
        }

        query = match scope {
            Some(CourseScope::Home) => query.filter(Filter::IsNull("user_course_id")),
            Some(CourseScope::Course(course_id)) => query.eq("user_course_id", course_id),
            None => query,
        };

        let rows = self
            .store()
            .select(Table::Rounds, query.desc("completed_at").limit(limit))
            .await?;
        from_rows(Table::Rounds, rows)
    }

    /// Every round of the user, newest start first.
    pub async fn list_all(&self) -> StorageResult<Vec<RoundEntity>> {
        let rows = self
            .store()
            .select(Table::Rounds, self.owned().desc("started_at"))
            .await?;
        from_rows(Table::Rounds, rows)
    }

    /// Write the hole snapshots of a new round, leaving existing ones untouched.
    pub async fn insert_holes(&self, holes: &[RoundHoleEntity]) -> StorageResult<()> {
        let rows = holes
            .iter()
            .map(|hole| to_row(Table::RoundHoles, hole))
            .collect::<StorageResult<Vec<_>>>()?;
        let conflict = Conflict {
            columns: vec!["round_id", "hole_number"],
            ignore_duplicates: true,
        };
        self.store()
            .upsert(Table::RoundHoles, rows, conflict)
            .await?;
        Ok(())
    }

    /// Hole snapshot of one hole.
    pub async fn hole(&self, round_id: Uuid, hole_number: u32) -> StorageResult<Option<RoundHoleEntity>> {
        let query = Query::new()
            .eq("round_id", round_id)
            .eq("hole_number", hole_number)
            .limit(1);
        let rows = self.store().select(Table::RoundHoles, query).await?;
        Ok(from_rows(Table::RoundHoles, rows)?.into_iter().next())
    }

    /// Hole snapshots ordered by hole number.
    pub async fn holes(&self, round_id: Uuid) -> StorageResult<Vec<RoundHoleEntity>> {
        let query = Query::new().eq("round_id", round_id).asc("hole_number");
        let rows = self.store().select(Table::RoundHoles, query).await?;
        from_rows(Table::RoundHoles, rows)
    }

    /// Flag a hole as committed. Stroke counting is updated separately.
    pub async fn mark_hole_committed(&self, round_id: Uuid, hole_number: u32) -> StorageResult<()> {
        let filters = vec![
            Filter::eq("round_id", round_id),
            Filter::eq("hole_number", hole_number),
        ];
        self.store()
            .update(
                Table::RoundHoles,
                filters,
                patch([("is_committed", Value::Bool(true))]),
            )
            .await?;
        Ok(())
    }

    /// Delete every hole snapshot of a round.
    pub async fn delete_holes(&self, round_id: Uuid) -> StorageResult<()> {
        self.store()
            .delete(Table::RoundHoles, vec![Filter::eq("round_id", round_id)])
            .await?;
        Ok(())
    }
}
