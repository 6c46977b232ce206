use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::BagClubEntity,
        ordered::{OrderedRecord, OrderedRepository},
    },
    dto::account::{BagClubView, CreateBagClubRequest, ReorderRequest},
    error::ServiceError,
    services::ordering::{ReorderCommand, delete_and_repack},
    state::session::Session,
};

const DUPLICATE_CLUB: &str = "That club already exists.";

/// Clubs in bag order.
pub async fn list_clubs(session: &Session) -> Result<Vec<BagClubView>, ServiceError> {
    let clubs = OrderedRepository::<BagClubEntity>::new(session).list().await?;
    Ok(clubs.into_iter().map(BagClubView::from).collect())
}

/// Append a club to the end of the bag.
pub async fn create_club(session: &Session, request: CreateBagClubRequest) -> Result<BagClubView, ServiceError> {
    let repo = OrderedRepository::<BagClubEntity>::new(session);
    let club = BagClubEntity {
        id: Uuid::new_v4(),
        user_id: session.user_id(),
        label: request.label.trim().to_string(),
        sort_order: repo.next_sort_order().await?,
        bsm: None,
    };

    repo.insert(&club).await.map_err(|err| {
        if err.is_duplicate() {
            ServiceError::InvalidState(DUPLICATE_CLUB.into())
        } else {
            err.into()
        }
    })?;

    info!(club_id = %club.id, sort_order = club.sort_order, "bag club added");
    Ok(BagClubView::from(club))
}

/// Replace the best stroke memory note; blank notes clear it.
pub async fn set_bsm(session: &Session, club_id: Uuid, bsm: Option<String>) -> Result<(), ServiceError> {
    let bsm = bsm
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    if !OrderedRepository::<BagClubEntity>::new(session)
        .set_bsm(club_id, bsm)
        .await?
    {
        return Err(ServiceError::NotFound(format!("club `{club_id}` not found")));
    }
    Ok(())
}

/// Delete a club and repack the remaining order.
pub async fn delete_club(session: &Session, club_id: Uuid) -> Result<(), ServiceError> {
    delete_and_repack(&OrderedRepository::<BagClubEntity>::new(session), club_id).await
}

/// Persist the given club order, restoring the previous one on failure.
pub async fn reorder_clubs(session: &Session, request: ReorderRequest) -> Result<Vec<BagClubView>, ServiceError> {
    let repo = OrderedRepository::<BagClubEntity>::new(session);
    let current: Vec<_> = repo.list().await?.iter().map(|club| club.ordinal()).collect();
    ReorderCommand::plan(&current, &request.ordered_ids)?
        .execute(&repo)
        .await?;
    list_clubs(session).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::table_store::{
        Table,
        memory::{MemoryStore, Verb},
    };

    fn session() -> (MemoryStore, Session) {
        let store = MemoryStore::new();
        let session = Session::new(Uuid::new_v4(), Arc::new(store.clone()));
        (store, session)
    }

    async fn add(session: &Session, label: &str) -> BagClubView {
        create_club(
            session,
            CreateBagClubRequest {
                label: label.into(),
            },
        )
        .await
        .unwrap()
    }

    fn labels(clubs: &[BagClubView]) -> Vec<(&str, u32)> {
        clubs
            .iter()
            .map(|club| (club.label.as_str(), club.sort_order))
            .collect()
    }

    #[tokio::test]
    async fn clubs_append_and_reject_duplicates() {
        let (_, session) = session();
        add(&session, "  Driver ").await;
        add(&session, "7 Iron").await;

        let err = create_club(
            &session,
            CreateBagClubRequest {
                label: "Driver".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(message) if message == DUPLICATE_CLUB));

        let clubs = list_clubs(&session).await.unwrap();
        assert_eq!(labels(&clubs), vec![("Driver", 1), ("7 Iron", 2)]);
    }

    #[tokio::test]
    async fn delete_repacks_remaining_clubs() {
        let (_, session) = session();
        let driver = add(&session, "Driver").await;
        add(&session, "5 Wood").await;
        add(&session, "Putter").await;

        delete_club(&session, driver.id).await.unwrap();
        let clubs = list_clubs(&session).await.unwrap();
        assert_eq!(labels(&clubs), vec![("5 Wood", 1), ("Putter", 2)]);

        assert!(matches!(
            delete_club(&session, driver.id).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn failed_reorder_restores_previous_order() {
        let (store, session) = session();
        let a = add(&session, "Driver").await;
        let b = add(&session, "Wedge").await;
        let c = add(&session, "Putter").await;

        store.fail_after(Table::BagClubs, Verb::Update, 1, "update rejected");
        let err = reorder_clubs(
            &session,
            ReorderRequest {
                ordered_ids: vec![c.id, a.id, b.id],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "update rejected");

        let clubs = list_clubs(&session).await.unwrap();
        assert_eq!(labels(&clubs), vec![("Driver", 1), ("Wedge", 2), ("Putter", 3)]);

        let reordered = reorder_clubs(
            &session,
            ReorderRequest {
                ordered_ids: vec![c.id, a.id, b.id],
            },
        )
        .await
        .unwrap();
        assert_eq!(labels(&reordered), vec![("Putter", 1), ("Driver", 2), ("Wedge", 3)]);
    }

    #[tokio::test]
    async fn blank_bsm_clears_the_note() {
        let (_, session) = session();
        let club = add(&session, "Driver").await;

        set_bsm(&session, club.id, Some(" smooth tempo ".into())).await.unwrap();
        assert_eq!(
            list_clubs(&session).await.unwrap()[0].bsm.as_deref(),
            Some("smooth tempo")
        );

        set_bsm(&session, club.id, Some("   ".into())).await.unwrap();
        assert_eq!(list_clubs(&session).await.unwrap()[0].bsm, None);

        assert!(matches!(
            set_bsm(&session, Uuid::new_v4(), None).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
