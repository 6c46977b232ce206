use std::sync::Arc;

use crate::dao::{
    models::{ContactMessageEntity, InterestSignupEntity},
    storage::StorageResult,
    table_store::{Table, TableStore, to_row},
};

/// Anonymous writes from the public forms. Uses the unscoped store handle.
#[derive(Clone)]
pub struct IntakeRepository {
    store: Arc<dyn TableStore>,
}

impl IntakeRepository {
    /// Repository writing through `store` without a user scope.
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self { store }
    }

    /// Store a contact form message.
    pub async fn insert_contact(&self, message: &ContactMessageEntity) -> StorageResult<()> {
        let row = to_row(Table::ContactMessages, message)?;
        self.store.insert(Table::ContactMessages, vec![row]).await?;
        Ok(())
    }

    /// Store a tier interest signup.
    pub async fn insert_interest(&self, signup: &InterestSignupEntity) -> StorageResult<()> {
        let row = to_row(Table::InterestSignups, signup)?;
        self.store.insert(Table::InterestSignups, vec![row]).await?;
        Ok(())
    }
}
