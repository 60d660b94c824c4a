use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::customer::CustomerEntity;
use mockall::automock;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// A booking customer. Identified by the pair of email and phone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Customer {
    pub id: Uuid,
    pub name: Arc<str>,
    pub email: Arc<str>,
    pub phone: Arc<str>,
    pub created: Option<time::PrimitiveDateTime>,
    pub deleted: Option<time::PrimitiveDateTime>,
    pub version: Uuid,
}
impl From<&CustomerEntity> for Customer {
    fn from(customer: &CustomerEntity) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            created: Some(customer.created),
            deleted: customer.deleted,
            version: customer.version,
        }
    }
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait CustomerService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Customer, ServiceError>;

    /// Returns the customer with that email and phone or creates one. A
    /// missing name is stored as an empty string. Only available with full
    /// authentication.
    async fn find_or_create(
        &self,
        name: Option<Arc<str>>,
        email: &str,
        phone: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Customer, ServiceError>;
}
