#[cfg(test)]
pub mod availability;
#[cfg(test)]
pub mod calendar;
#[cfg(test)]
pub mod customer;
#[cfg(test)]
pub mod employee;
#[cfg(test)]
pub mod reservation;
