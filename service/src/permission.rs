use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

/// Store managers. Required for every scheduling write.
pub const MANAGER_PRIVILEGE: &str = "manager";
/// Any staff member of a store.
pub const EMPLOYEE_PRIVILEGE: &str = "employee";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EmployeeRole {
    Manager,
    Associate,
    PartTime,
}
impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeRole::Manager => "manager",
            EmployeeRole::Associate => "associate",
            EmployeeRole::PartTime => "part_time",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorRole {
    Manager,
    Associate,
    PartTime,
    Customer,
}
impl ActorRole {
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "manager" => Some(ActorRole::Manager),
            "associate" => Some(ActorRole::Associate),
            "part_time" => Some(ActorRole::PartTime),
            "customer" => Some(ActorRole::Customer),
            _ => None,
        }
    }
}

/// The acting user. Either a staff member or a customer.
///
/// The id may be missing when the identity provider only supplied a role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Employee { id: Option<Uuid>, role: EmployeeRole },
    Customer { id: Option<Uuid> },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActorIdentity {
    pub id: Option<Uuid>,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: Option<Uuid>, role: ActorRole) -> Self {
        match role {
            ActorRole::Manager => Actor::Employee {
                id,
                role: EmployeeRole::Manager,
            },
            ActorRole::Associate => Actor::Employee {
                id,
                role: EmployeeRole::Associate,
            },
            ActorRole::PartTime => Actor::Employee {
                id,
                role: EmployeeRole::PartTime,
            },
            ActorRole::Customer => Actor::Customer { id },
        }
    }

    pub fn identity(&self) -> ActorIdentity {
        match self {
            Actor::Employee { id, role } => ActorIdentity {
                id: *id,
                role: match role {
                    EmployeeRole::Manager => ActorRole::Manager,
                    EmployeeRole::Associate => ActorRole::Associate,
                    EmployeeRole::PartTime => ActorRole::PartTime,
                },
            },
            Actor::Customer { id } => ActorIdentity {
                id: *id,
                role: ActorRole::Customer,
            },
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.identity().id
    }

    pub fn has_privilege(&self, privilege: &str) -> bool {
        match self {
            Actor::Employee {
                role: EmployeeRole::Manager,
                ..
            } => privilege == MANAGER_PRIVILEGE || privilege == EMPLOYEE_PRIVILEGE,
            Actor::Employee { .. } => privilege == EMPLOYEE_PRIVILEGE,
            Actor::Customer { .. } => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication<Context: Clone + PartialEq + Eq + Send + Sync + Debug + 'static> {
    Full,
    Context(Context),
}
impl<Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static> From<Context>
    for Authentication<Context>
{
    fn from(context: Context) -> Self {
        Self::Context(context)
    }
}

#[automock(type Context=();)]
#[async_trait]
pub trait PermissionService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;

    /// Fails with `Unauthorized` when there is no acting user and with
    /// `Forbidden` when the acting user lacks the privilege.
    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    /// Passes when the acting user is the given employee.
    async fn check_employee(
        &self,
        employee_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    async fn check_only_full_authentication(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;

    /// `None` for full authentication and for anonymous requests.
    async fn current_actor(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Actor>, ServiceError>;
}
