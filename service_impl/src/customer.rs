use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    customer::{CustomerDao, CustomerEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    customer::{Customer, CustomerService},
    permission::{Authentication, EMPLOYEE_PRIVILEGE},
    uuid_service::UuidService,
    EntityKind, PermissionService, ServiceError,
};
use tracing::info;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct CustomerServiceImpl: CustomerService = CustomerServiceDeps {
        CustomerDao: CustomerDao<Transaction = Self::Transaction> = customer_dao,
        PermissionService: PermissionService<Context = Self::Context> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const CUSTOMER_SERVICE_PROCESS: &str = "customer-service";

#[async_trait]
impl<Deps: CustomerServiceDeps> CustomerService for CustomerServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Customer, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(EMPLOYEE_PRIVILEGE, context)
            .await?;
        let customer = self
            .customer_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Customer::from)
            .ok_or(ServiceError::EntityNotFound(EntityKind::Customer, id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(customer)
    }

    async fn find_or_create(
        &self,
        name: Option<Arc<str>>,
        email: &str,
        phone: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Customer, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_only_full_authentication(context)
            .await?;

        if let Some(existing) = self
            .customer_dao
            .find_by_email_and_phone(email, phone, tx.clone())
            .await?
        {
            self.transaction_dao.commit(tx).await?;
            return Ok(Customer::from(&existing));
        }

        let entity = CustomerEntity {
            id: self.uuid_service.new_uuid("CustomerService::create id"),
            name: name.unwrap_or_else(|| "".into()),
            email: email.into(),
            phone: phone.into(),
            created: self.clock_service.date_time_now(),
            deleted: None,
            version: self.uuid_service.new_uuid("CustomerService::create version"),
        };
        self.customer_dao
            .create(&entity, CUSTOMER_SERVICE_PROCESS, tx.clone())
            .await?;
        info!(customer_id = %entity.id, "Created customer");
        self.transaction_dao.commit(tx).await?;
        Ok(Customer::from(&entity))
    }
}
