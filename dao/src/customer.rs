use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub email: Arc<str>,
    pub phone: Arc<str>,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait CustomerDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<CustomerEntity>, DaoError>;
    async fn find_by_email_and_phone(
        &self,
        email: &str,
        phone: &str,
        tx: Self::Transaction,
    ) -> Result<Option<CustomerEntity>, DaoError>;
    async fn create(
        &self,
        entity: &CustomerEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
