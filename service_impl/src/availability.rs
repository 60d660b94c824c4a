use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    availability::{AvailabilityDao, AvailabilityEntity},
    TransactionDao,
};
use service::{
    availability::{Availability, AvailabilityService},
    clock::ClockService,
    employee::EmployeeService,
    permission::{Authentication, MANAGER_PRIVILEGE},
    uuid_service::UuidService,
    EntityKind, PermissionService, ServiceError, ValidationFailureItem,
};
use tokio::join;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct AvailabilityServiceImpl: AvailabilityService = AvailabilityServiceDeps {
        AvailabilityDao: AvailabilityDao<Transaction = Self::Transaction> = availability_dao,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const AVAILABILITY_SERVICE_PROCESS: &str = "availability-service";

impl<Deps: AvailabilityServiceDeps> AvailabilityServiceImpl<Deps> {
    async fn check_manager_or_self(
        &self,
        employee_id: Uuid,
        context: Authentication<Deps::Context>,
    ) -> Result<(), ServiceError> {
        let (manager, own) = join!(
            self.permission_service
                .check_permission(MANAGER_PRIVILEGE, context.clone()),
            self.permission_service.check_employee(employee_id, context),
        );
        manager.or(own)
    }

    async fn find_entity(
        &self,
        id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<AvailabilityEntity, ServiceError> {
        self.availability_dao
            .find_by_id(id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(EntityKind::Availability, id))
    }
}

#[async_trait]
impl<Deps: AvailabilityServiceDeps> AvailabilityService for AvailabilityServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_by_employee(
        &self,
        employee_id: Uuid,
        from: Option<time::Date>,
        to: Option<time::Date>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Availability]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_manager_or_self(employee_id, context).await?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ServiceError::DateOrderWrong(from, to));
            }
        }
        let availabilities = self
            .availability_dao
            .find_by_employee_id(employee_id, from, to, tx.clone())
            .await?
            .iter()
            .map(Availability::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(availabilities)
    }

    async fn create(
        &self,
        availability: &Availability,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_manager_or_self(availability.employee_id, context)
            .await?;

        if availability.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if availability.version != Uuid::nil() {
            return Err(ServiceError::VersionSetOnCreate);
        }
        if availability.start_time >= availability.end_time {
            return Err(ServiceError::TimeOrderWrong(
                availability.start_time,
                availability.end_time,
            ));
        }
        self.employee_service
            .get(
                availability.employee_id,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;

        let availability = Availability {
            id: self.uuid_service.new_uuid("AvailabilityService::create id"),
            version: self
                .uuid_service
                .new_uuid("AvailabilityService::create version"),
            created: Some(self.clock_service.date_time_now()),
            deleted: None,
            ..availability.clone()
        };
        self.availability_dao
            .create(
                &AvailabilityEntity::try_from(&availability)?,
                AVAILABILITY_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(availability)
    }

    async fn update(
        &self,
        availability: &Availability,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Availability, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let persisted = self.find_entity(availability.id, tx.clone()).await?;
        self.check_manager_or_self(persisted.employee_id, context)
            .await?;

        if availability.version != persisted.version {
            return Err(ServiceError::EntityConflicts(
                availability.id,
                persisted.version,
                availability.version,
            ));
        }
        let mut failures = Vec::new();
        if availability.employee_id != persisted.employee_id {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "employee_id".into(),
            ));
        }
        if availability.deleted != persisted.deleted {
            failures.push(ValidationFailureItem::ModificationNotAllowed(
                "deleted".into(),
            ));
        }
        if !failures.is_empty() {
            return Err(ServiceError::ValidationError(failures.into()));
        }
        if availability.start_time >= availability.end_time {
            return Err(ServiceError::TimeOrderWrong(
                availability.start_time,
                availability.end_time,
            ));
        }

        let availability = Availability {
            created: Some(persisted.created),
            version: self
                .uuid_service
                .new_uuid("AvailabilityService::update version"),
            ..availability.clone()
        };
        self.availability_dao
            .update(
                &AvailabilityEntity::try_from(&availability)?,
                AVAILABILITY_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(availability)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let mut entity = self.find_entity(id, tx.clone()).await?;
        self.check_manager_or_self(entity.employee_id, context)
            .await?;
        entity.deleted = Some(self.clock_service.date_time_now());
        entity.version = self
            .uuid_service
            .new_uuid("AvailabilityService::delete version");
        self.availability_dao
            .update(&entity, AVAILABILITY_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn is_blocked(
        &self,
        employee_id: Uuid,
        date: time::Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<bool, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.check_manager_or_self(employee_id, context).await?;
        let blocked = !self
            .availability_dao
            .find_blocked_by_employee_and_date(employee_id, date, tx.clone())
            .await?
            .is_empty();
        self.transaction_dao.commit(tx).await?;
        Ok(blocked)
    }
}
