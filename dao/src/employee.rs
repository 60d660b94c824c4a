use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmployeeTypeEntity {
    Manager,
    Associate,
    PartTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub email: Arc<str>,
    pub password_hash: Option<Arc<str>>,
    pub employee_type: EmployeeTypeEntity,
    pub max_hours: Decimal,
    pub current_hours: Decimal,
    pub hourly_rate: Decimal,
    pub store_id: Uuid,
    pub created: time::PrimitiveDateTime,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait EmployeeDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
    async fn find_by_store_id(
        &self,
        store_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[EmployeeEntity]>, DaoError>;
    async fn find_by_email(
        &self,
        email: &str,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
    async fn create(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
