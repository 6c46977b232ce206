//! Dense `sort_order` maintenance shared by bag clubs and mental elements.

use std::collections::HashSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::ordered::{OrderedRecord, OrderedRepository},
    domain::sequence::{Ordinal, repack},
    error::ServiceError,
};

/// Reorder of a whole list: the rewrites to apply and the values to restore if one fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderCommand {
    rewrites: Vec<Ordinal>,
    snapshot: Vec<Ordinal>,
}

impl ReorderCommand {
    /// Plan a reorder of `current` into `ordered_ids`, which must name every item exactly once.
    pub fn plan(current: &[Ordinal], ordered_ids: &[Uuid]) -> Result<Self, ServiceError> {
        let known: HashSet<Uuid> = current.iter().map(|item| item.id).collect();
        let requested: HashSet<Uuid> = ordered_ids.iter().copied().collect();
        if requested.len() != ordered_ids.len() || requested != known {
            return Err(ServiceError::InvalidInput(
                "ordered_ids must list every item exactly once".into(),
            ));
        }

        let desired: Vec<Ordinal> = ordered_ids
            .iter()
            .filter_map(|id| current.iter().find(|item| item.id == *id).copied())
            .collect();
        let rewrites = repack(&desired);
        let snapshot = rewrites
            .iter()
            .filter_map(|rewrite| current.iter().find(|item| item.id == rewrite.id).copied())
            .collect();

        Ok(Self { rewrites, snapshot })
    }

    /// True when the requested order matches the current one.
    pub fn is_noop(&self) -> bool {
        self.rewrites.is_empty()
    }

    /// Apply every rewrite in order. When one fails, the rewrites already applied are put
    /// back to their previous values and the original error is returned.
    pub async fn execute<T: OrderedRecord>(&self, repo: &OrderedRepository<'_, T>) -> Result<(), ServiceError> {
        for (applied, rewrite) in self.rewrites.iter().enumerate() {
            if let Err(err) = repo.set_sort_order(rewrite.id, rewrite.sort_order).await {
                warn!(table = %T::TABLE, applied, error = %err, "reorder failed; reverting");
                self.revert(repo, applied).await;
                return Err(err.into());
            }
        }
        debug!(table = %T::TABLE, rewrites = self.rewrites.len(), "list reordered");
        Ok(())
    }

    async fn revert<T: OrderedRecord>(&self, repo: &OrderedRepository<'_, T>, applied: usize) {
        for previous in self.snapshot.iter().take(applied).rev() {
            if let Err(err) = repo.set_sort_order(previous.id, previous.sort_order).await {
                warn!(table = %T::TABLE, id = %previous.id, error = %err, "failed to restore sort order");
            }
        }
    }
}

/// Delete one item and close the gap it leaves. Rewrites are issued one by one without rollback.
pub async fn delete_and_repack<T: OrderedRecord>(repo: &OrderedRepository<'_, T>, id: Uuid) -> Result<(), ServiceError> {
    if !repo.delete(id).await? {
        return Err(ServiceError::NotFound(format!("`{}` item `{id}` not found", T::TABLE)));
    }

    let remaining: Vec<Ordinal> = repo
        .list()
        .await?
        .iter()
        .map(|item| item.ordinal())
        .collect();
    for rewrite in repack(&remaining) {
        repo.set_sort_order(rewrite.id, rewrite.sort_order).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordinals(count: u32) -> Vec<Ordinal> {
        (1..=count)
            .map(|sort_order| Ordinal {
                id: Uuid::new_v4(),
                sort_order,
            })
            .collect()
    }

    #[test]
    fn plan_requires_a_permutation() {
        let current = ordinals(3);
        let ids: Vec<Uuid> = current.iter().map(|item| item.id).collect();

        assert!(ReorderCommand::plan(&current, &ids[..2]).is_err());
        assert!(ReorderCommand::plan(&current, &[ids[0], ids[0], ids[1]]).is_err());
        assert!(ReorderCommand::plan(&current, &[ids[0], ids[1], Uuid::new_v4()]).is_err());
        assert!(ReorderCommand::plan(&current, &ids).unwrap().is_noop());
    }

    #[test]
    fn plan_snapshots_the_values_it_overwrites() {
        let current = ordinals(3);
        let ids = [current[2].id, current[0].id, current[1].id];
        let command = ReorderCommand::plan(&current, &ids).unwrap();

        assert_eq!(
            command.rewrites,
            vec![
                Ordinal {
                    id: current[2].id,
                    sort_order: 1
                },
                Ordinal {
                    id: current[0].id,
                    sort_order: 2
                },
                Ordinal {
                    id: current[1].id,
                    sort_order: 3
                },
            ]
        );
        assert_eq!(command.snapshot, vec![current[2], current[0], current[1]]);
    }
}
