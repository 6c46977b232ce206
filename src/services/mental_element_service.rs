use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::MentalElementEntity,
        ordered::{OrderedRecord, OrderedRepository},
    },
    dto::account::{CreateMentalElementRequest, MentalElementView, ReorderRequest},
    error::ServiceError,
    services::ordering::{ReorderCommand, delete_and_repack},
    state::session::Session,
};

const DUPLICATE_ELEMENT: &str = "That mental element already exists.";

/// Mental elements in display order.
pub async fn list_elements(session: &Session) -> Result<Vec<MentalElementView>, ServiceError> {
    let elements = OrderedRepository::<MentalElementEntity>::new(session)
        .list()
        .await?;
    Ok(elements.into_iter().map(MentalElementView::from).collect())
}

/// Append a mental element after trimming its label.
pub async fn create_element(
    session: &Session,
    request: CreateMentalElementRequest,
) -> Result<MentalElementView, ServiceError> {
    let repo = OrderedRepository::<MentalElementEntity>::new(session);
    let element = MentalElementEntity {
        id: Uuid::new_v4(),
        user_id: session.user_id(),
        label: request.label.trim().to_string(),
        sort_order: repo.next_sort_order().await?,
    };

    match repo.insert(&element).await {
        Ok(()) => {}
        Err(err) if err.is_duplicate() => {
            return Err(ServiceError::InvalidState(DUPLICATE_ELEMENT.into()));
        }
        Err(err) => return Err(err.into()),
    }

    info!(element_id = %element.id, "mental element added");
    Ok(MentalElementView::from(element))
}

/// Delete a mental element and repack the remaining order.
pub async fn delete_element(session: &Session, element_id: Uuid) -> Result<(), ServiceError> {
    delete_and_repack(&OrderedRepository::<MentalElementEntity>::new(session), element_id).await
}

/// Persist `1..N` in the requested order, restoring the previous order when a write fails.
pub async fn reorder_elements(
    session: &Session,
    request: ReorderRequest,
) -> Result<Vec<MentalElementView>, ServiceError> {
    let repo = OrderedRepository::<MentalElementEntity>::new(session);
    let current: Vec<_> = repo
        .list()
        .await?
        .iter()
        .map(|element| element.ordinal())
        .collect();

    let command = ReorderCommand::plan(&current, &request.ordered_ids)?;
    if !command.is_noop() {
        command.execute(&repo).await?;
    }
    list_elements(session).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dao::table_store::memory::MemoryStore;

    fn session() -> Session {
        Session::new(Uuid::new_v4(), Arc::new(MemoryStore::new()))
    }

    async fn add(session: &Session, label: &str) -> Result<MentalElementView, ServiceError> {
        create_element(
            session,
            CreateMentalElementRequest {
                label: label.into(),
            },
        )
        .await
    }

    #[tokio::test]
    async fn duplicate_label_is_reported() {
        let session = session();
        add(&session, "Breathe").await.unwrap();
        let err = add(&session, " Breathe ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(message) if message == DUPLICATE_ELEMENT));
    }

    #[tokio::test]
    async fn labels_are_scoped_per_user() {
        let store = Arc::new(MemoryStore::new());
        let alice = Session::new(Uuid::new_v4(), store.clone());
        let bob = Session::new(Uuid::new_v4(), store);

        add(&alice, "Commit").await.unwrap();
        add(&bob, "Commit").await.unwrap();
        assert_eq!(list_elements(&alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reorder_and_delete_keep_order_dense() {
        let session = session();
        let first = add(&session, "See it").await.unwrap();
        let second = add(&session, "Feel it").await.unwrap();
        let third = add(&session, "Trust it").await.unwrap();

        let reordered = reorder_elements(
            &session,
            ReorderRequest {
                ordered_ids: vec![third.id, first.id, second.id],
            },
        )
        .await
        .unwrap();
        let ids: Vec<Uuid> = reordered.iter().map(|element| element.id).collect();
        assert_eq!(ids, vec![third.id, first.id, second.id]);

        delete_element(&session, third.id).await.unwrap();
        let remaining: Vec<(Uuid, u32)> = list_elements(&session)
            .await
            .unwrap()
            .iter()
            .map(|element| (element.id, element.sort_order))
            .collect();
        assert_eq!(remaining, vec![(first.id, 1), (second.id, 2)]);

        let err = reorder_elements(
            &session,
            ReorderRequest {
                ordered_ids: vec![first.id],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }
}
