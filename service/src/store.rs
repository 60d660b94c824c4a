use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::store::StoreEntity;
use mockall::automock;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Store {
    pub id: Uuid,
    pub name: Arc<str>,
    pub weekly_budget: Decimal,
    pub open_time: time::Time,
    pub close_time: time::Time,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&StoreEntity> for Store {
    fn from(store: &StoreEntity) -> Self {
        Self {
            id: store.id,
            name: store.name.clone(),
            weekly_budget: store.weekly_budget,
            open_time: store.open_time,
            close_time: store.close_time,
            created: Some(store.created),
            deleted: store.deleted,
            version: store.version,
        }
    }
}
impl TryFrom<&Store> for StoreEntity {
    type Error = ServiceError;
    fn try_from(store: &Store) -> Result<Self, Self::Error> {
        Ok(Self {
            id: store.id,
            name: store.name.clone(),
            weekly_budget: store.weekly_budget,
            open_time: store.open_time,
            close_time: store.close_time,
            created: store.created.ok_or(ServiceError::InternalError)?,
            deleted: store.deleted,
            version: store.version,
        })
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait StoreService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Store]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError>;
    async fn create(
        &self,
        store: &Store,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError>;
    async fn update(
        &self,
        store: &Store,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
