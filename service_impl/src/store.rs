use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    store::{StoreDao, StoreEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    permission::{Authentication, EMPLOYEE_PRIVILEGE, MANAGER_PRIVILEGE},
    store::{Store, StoreService},
    uuid_service::UuidService,
    EntityKind, PermissionService, ServiceError, ValidationFailureItem,
};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct StoreServiceImpl: StoreService = StoreServiceDeps {
        StoreDao: StoreDao<Transaction = Self::Transaction> = store_dao,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const STORE_SERVICE_PROCESS: &str = "store-service";

fn check_store_hours(store: &Store) -> Result<(), ServiceError> {
    if store.open_time >= store.close_time {
        return Err(ServiceError::TimeOrderWrong(
            store.open_time,
            store.close_time,
        ));
    }
    Ok(())
}

#[async_trait]
impl<Deps: StoreServiceDeps> StoreService for StoreServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Store]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context)
            .await?;
        let stores = self
            .store_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Store::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(stores)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context)
            .await?;
        let store = self
            .store_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Store::from)
            .ok_or(ServiceError::EntityNotFound(EntityKind::Store, id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(store)
    }

    async fn create(
        &self,
        store: &Store,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        if store.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if store.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if store.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::InvalidValue("name".into()),
            ])));
        }
        check_store_hours(store)?;

        let store = Store {
            id: self.uuid_service.new_uuid("StoreService::create id"),
            version: self.uuid_service.new_uuid("StoreService::create version"),
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..store.clone()
        };
        self.store_dao
            .create(
                &StoreEntity::try_from(&store)?,
                STORE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;

        self.transaction_dao.commit(tx).await?;
        Ok(store)
    }

    async fn update(
        &self,
        store: &Store,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Store, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;

        let persisted = self
            .store_dao
            .find_by_id(store.id, tx.clone())
            .await?
            .as_ref()
            .map(Store::from)
            .ok_or(ServiceError::EntityNotFound(EntityKind::Store, store.id))?;
        if store.version != persisted.version {
            return Err(ServiceError::EntityConflicts(
                store.id,
                persisted.version,
                store.version,
            ));
        }
        if store.deleted != persisted.deleted {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::ModificationNotAllowed("deleted".into()),
            ])));
        }
        check_store_hours(store)?;

        let store = Store {
            created: persisted.created,
            version: self.uuid_service.new_uuid("StoreService::update version"),
            ..store.clone()
        };
        self.store_dao
            .update(
                &StoreEntity::try_from(&store)?,
                STORE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(store)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(MANAGER_PRIVILEGE, context)
            .await?;
        let mut store_entity = self
            .store_dao
            .find_by_id(id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(EntityKind::Store, id))?;
        store_entity.deleted = Some(self.clock_service.date_time_now());
        store_entity.version = self.uuid_service.new_uuid("StoreService::delete version");
        self.store_dao
            .update(&store_entity, STORE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
