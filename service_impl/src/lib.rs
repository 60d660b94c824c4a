pub mod availability;
pub mod calendar;
pub mod clock;
pub mod config;
pub mod customer;
pub mod employee;
pub mod macros;
pub mod permission;
pub mod reservation;
pub mod shift;
pub mod slot;
pub mod store;
pub mod uuid_service;
pub mod weekly_stats;

#[cfg(test)]
mod test;

pub use permission::PermissionServiceImpl;
pub use permission::UserServiceImpl;
