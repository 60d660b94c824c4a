use mockall::automock;
use uuid::Uuid;

#[automock]
pub trait UuidService {
    /// `usage` names the call site, e.g. `"ShiftService::create id"`.
    fn new_uuid(&self, usage: &str) -> Uuid;
}
