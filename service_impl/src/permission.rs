use std::sync::Arc;

use async_trait::async_trait;
use service::permission::{Actor, Authentication};
use service::ServiceError;
use uuid::Uuid;

pub struct PermissionServiceImpl<UserService>
where
    UserService: service::user_service::UserService + Send + Sync,
{
    user_service: Arc<UserService>,
}
impl<UserService> PermissionServiceImpl<UserService>
where
    UserService: service::user_service::UserService + Send + Sync,
{
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    async fn require_actor(&self, context: UserService::Context) -> Result<Actor, ServiceError> {
        self.user_service
            .current_actor(context)
            .await?
            .ok_or(ServiceError::Unauthorized)
    }
}

#[async_trait]
impl<UserService> service::PermissionService for PermissionServiceImpl<UserService>
where
    UserService: service::user_service::UserService + Send + Sync,
{
    type Context = UserService::Context;

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => {
                if self.require_actor(context).await?.has_privilege(privilege) {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden)
                }
            }
        }
    }

    async fn check_employee(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => match self.require_actor(context).await? {
                Actor::Employee { id: Some(id), .. } if id == employee_id => Ok(()),
                _ => Err(ServiceError::Forbidden),
            },
        }
    }

    async fn check_only_full_authentication(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(_) => Err(ServiceError::Forbidden),
        }
    }

    async fn current_actor(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Actor>, ServiceError> {
        match context {
            Authentication::Full => Ok(None),
            Authentication::Context(context) => self.user_service.current_actor(context).await,
        }
    }
}

/// Takes the acting user from the request context as placed there by the
/// REST session middleware.
pub struct UserServiceImpl;

#[async_trait]
impl service::user_service::UserService for UserServiceImpl {
    type Context = Option<Actor>;

    async fn current_actor(&self, context: Self::Context) -> Result<Option<Actor>, ServiceError> {
        Ok(context)
    }
}
