use serde_json::Value;
use uuid::Uuid;

use crate::{
    dao::{
        models::{HomeClubEntity, HomeClubHoleEntity, UserCourseEntity, UserCourseHoleEntity},
        storage::StorageResult,
        table_store::{Filter, Query, Table, TableStore, from_rows, patch, to_row},
    },
    state::session::Session,
};

/// User courses and the home club layout of the session user.
pub struct CourseRepository<'a> {
    session: &'a Session,
}

impl<'a> CourseRepository<'a> {
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

    /// Courses with the default first, then by creation.
    pub async fn list(&self) -> StorageResult<Vec<UserCourseEntity>> {
        let query = self.owned().desc("is_default").asc("created_at");
        let rows = self.store().select(Table::UserCourses, query).await?;
        from_rows(Table::UserCourses, rows)
    }

    /// One course owned by the session user.
    pub async fn find(&self, course_id: Uuid) -> StorageResult<Option<UserCourseEntity>> {
        let query = self.owned().eq("id", course_id).limit(1);
        let rows = self.store().select(Table::UserCourses, query).await?;
        Ok(from_rows(Table::UserCourses, rows)?.into_iter().next())
    }

    /// Hole layout of a course ordered by hole number.
    pub async fn holes(&self, course_id: Uuid) -> StorageResult<Vec<UserCourseHoleEntity>> {
        let query = Query::new()
            .eq("user_course_id", course_id)
            .asc("hole_number");
        let rows = self.store().select(Table::UserCourseHoles, query).await?;
        from_rows(Table::UserCourseHoles, rows)
    }

    /// Insert a course and then its holes.
    pub async fn insert(&self, course: &UserCourseEntity, holes: &[UserCourseHoleEntity]) -> StorageResult<()> {
        let row = to_row(Table::UserCourses, course)?;
        self.store().insert(Table::UserCourses, vec![row]).await?;

        let rows = holes
            .iter()
            .map(|hole| to_row(Table::UserCourseHoles, hole))
            .collect::<StorageResult<Vec<_>>>()?;
        if !rows.is_empty() {
            self.store().insert(Table::UserCourseHoles, rows).await?;
        }
        Ok(())
    }

    /// Clear the default flag on every course, then set it on `course_id`.
    pub async fn set_default(&self, course_id: Uuid) -> StorageResult<()> {
        let user = Filter::eq("user_id", self.session.user_id());
        self.store()
            .update(
                Table::UserCourses,
                vec![user.clone()],
                patch([("is_default", Value::Bool(false))]),
            )
            .await?;
        self.store()
            .update(
                Table::UserCourses,
                vec![user, Filter::eq("id", course_id)],
                patch([("is_default", Value::Bool(true))]),
            )
            .await?;
        Ok(())
    }

    /// Delete a course and its holes, returning whether the course existed.
    pub async fn delete(&self, course_id: Uuid) -> StorageResult<bool> {
        // Hole rows carry no owner column, so ownership is resolved on the course first.
        if self.find(course_id).await?.is_none() {
            return Ok(false);
        }
        self.store()
            .delete(
                Table::UserCourseHoles,
                vec![Filter::eq("user_course_id", course_id)],
            )
            .await?;
        let deleted = self
            .store()
            .delete(
                Table::UserCourses,
                vec![
                    Filter::eq("id", course_id),
                    Filter::eq("user_id", self.session.user_id()),
                ],
            )
            .await?;
        Ok(!deleted.is_empty())
    }

    /// The session user's home club, if configured.
    pub async fn home_club(&self) -> StorageResult<Option<HomeClubEntity>> {
        let rows = self
            .store()
            .select(Table::HomeClubs, self.owned().limit(1))
            .await?;
        Ok(from_rows(Table::HomeClubs, rows)?.into_iter().next())
    }

    /// Hole layout of the home club ordered by hole number.
    pub async fn home_club_holes(&self, home_club_id: Uuid) -> StorageResult<Vec<HomeClubHoleEntity>> {
        let query = Query::new()
            .eq("home_club_id", home_club_id)
            .asc("hole_number");
        let rows = self.store().select(Table::HomeClubHoles, query).await?;
        from_rows(Table::HomeClubHoles, rows)
    }

    /// Create or rename the home club, then replace its hole layout.
    pub async fn save_home_club(&self, club: &HomeClubEntity, holes: &[HomeClubHoleEntity], exists: bool) -> StorageResult<()> {
        if exists {
            self.store()
                .update(
                    Table::HomeClubs,
                    vec![
                        Filter::eq("id", club.id),
                        Filter::eq("user_id", self.session.user_id()),
                    ],
                    patch([
                        ("name", Value::String(club.name.clone())),
                        ("holes_count", Value::from(club.holes_count)),
                    ]),
                )
                .await?;
            self.store()
                .delete(Table::HomeClubHoles, vec![Filter::eq("home_club_id", club.id)])
                .await?;
        } else {
            let row = to_row(Table::HomeClubs, club)?;
            self.store().insert(Table::HomeClubs, vec![row]).await?;
        }

        let rows = holes
            .iter()
            .map(|hole| to_row(Table::HomeClubHoles, hole))
            .collect::<StorageResult<Vec<_>>>()?;
        if !rows.is_empty() {
            self.store().insert(Table::HomeClubHoles, rows).await?;
        }
        Ok(())
    }
}
