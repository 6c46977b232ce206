use serde_json::Value;
use uuid::Uuid;

use crate::{
    dao::{
        models::StrokeEntity,
        storage::StorageResult,
        table_store::{Filter, Query, Table, TableStore, from_rows, patch, to_row},
    },
    state::session::Session,
};

/// Strokes of rounds already checked to belong to the session user.
pub struct StrokeRepository<'a> {
    session: &'a Session,
}

impl<'a> StrokeRepository<'a> {
    /// Repository bound to `session`.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    fn store(&self) -> &dyn TableStore {
        self.session.store()
    }

    /// Insert strokes in one request.
    pub async fn insert_many(&self, strokes: &[StrokeEntity]) -> StorageResult<()> {
        if strokes.is_empty() {
            return Ok(());
        }
        let rows = strokes
            .iter()
            .map(|stroke| to_row(Table::Strokes, stroke))
            .collect::<StorageResult<Vec<_>>>()?;
        self.store().insert(Table::Strokes, rows).await?;
        Ok(())
    }

    /// One stroke of a round.
    pub async fn find(&self, round_id: Uuid, stroke_id: Uuid) -> StorageResult<Option<StrokeEntity>> {
        let query = Query::new()
            .eq("id", stroke_id)
            .eq("round_id", round_id)
            .limit(1);
        let rows = self.store().select(Table::Strokes, query).await?;
        Ok(from_rows(Table::Strokes, rows)?.into_iter().next())
    }

    /// Strokes of one hole in display order.
    pub async fn list_for_hole(&self, round_id: Uuid, hole_number: u32) -> StorageResult<Vec<StrokeEntity>> {
        let query = Query::new()
            .eq("round_id", round_id)
            .eq("hole_number", hole_number)
            .asc("seq");
        let rows = self.store().select(Table::Strokes, query).await?;
        from_rows(Table::Strokes, rows)
    }

    /// Strokes of the given rounds ordered by hole then `seq`, optionally only counted ones.
    pub async fn list_for_rounds(&self, round_ids: &[Uuid], counted_only: bool) -> StorageResult<Vec<StrokeEntity>> {
        if round_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = Query::new().filter(Filter::is_in("round_id", round_ids.iter().copied()));
        if counted_only {
            query = query.eq("is_counted", true);
        }
        let rows = self
            .store()
            .select(Table::Strokes, query.asc("hole_number").asc("seq"))
            .await?;
        from_rows(Table::Strokes, rows)
    }

    /// Move a stroke to another `seq`.
    pub async fn set_seq(&self, stroke_id: Uuid, seq: u32) -> StorageResult<()> {
        self.update_one(stroke_id, "seq", Value::from(seq)).await
    }

    /// Set the mental focus flag of a stroke.
    pub async fn set_mental_ok(&self, stroke_id: Uuid, mental_ok: bool) -> StorageResult<()> {
        self.update_one(stroke_id, "mental_ok", Value::Bool(mental_ok)).await
    }

    /// Set or clear the club of a stroke.
    pub async fn set_club(&self, stroke_id: Uuid, club_id: Option<Uuid>) -> StorageResult<()> {
        let value = club_id
            .map(|id| Value::String(id.to_string()))
            .unwrap_or(Value::Null);
        self.update_one(stroke_id, "club_id", value).await
    }

    async fn update_one(&self, stroke_id: Uuid, column: &'static str, value: Value) -> StorageResult<()> {
        self.store()
            .update(
                Table::Strokes,
                vec![Filter::eq("id", stroke_id)],
                patch([(column, value)]),
            )
            .await?;
        Ok(())
    }

    /// Count every stroke of a hole toward statistics.
    pub async fn mark_counted(&self, round_id: Uuid, hole_number: u32) -> StorageResult<()> {
        let filters = vec![
            Filter::eq("round_id", round_id),
            Filter::eq("hole_number", hole_number),
        ];
        self.store()
            .update(Table::Strokes, filters, patch([("is_counted", Value::Bool(true))]))
            .await?;
        Ok(())
    }

    /// Delete one stroke, returning whether it existed.
    pub async fn delete(&self, round_id: Uuid, stroke_id: Uuid) -> StorageResult<bool> {
        let filters = vec![Filter::eq("id", stroke_id), Filter::eq("round_id", round_id)];
        let deleted = self.store().delete(Table::Strokes, filters).await?;
        Ok(!deleted.is_empty())
    }

    /// Delete every stroke of a round.
    pub async fn delete_for_round(&self, round_id: Uuid) -> StorageResult<()> {
        self.store()
            .delete(Table::Strokes, vec![Filter::eq("round_id", round_id)])
            .await?;
        Ok(())
    }
}
