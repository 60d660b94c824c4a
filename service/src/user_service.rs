use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;

use crate::permission::Actor;
use crate::ServiceError;

#[automock(type Context=();)]
#[async_trait]
pub trait UserService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;

    async fn current_actor(&self, context: Self::Context) -> Result<Option<Actor>, ServiceError>;
}
