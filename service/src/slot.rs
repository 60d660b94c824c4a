use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::Time;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::{ServiceError, ValidationFailureItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSlot {
    pub start_time: Time,
    pub end_time: Time,
    pub available: bool,
}

/// Which working window the slots are cut from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotWindow {
    /// The employee's shift on that date.
    #[default]
    Shift,
    /// The opening hours of the employee's store.
    StoreHours,
}

fn minutes_of_day(time: Time) -> u32 {
    u32::from(time.hour()) * 60 + u32::from(time.minute())
}

fn time_from_minutes(minutes: u32) -> Result<Time, ServiceError> {
    Ok(Time::from_hms((minutes / 60) as u8, (minutes % 60) as u8, 0)?)
}

/// Cuts `window_start..window_end` into consecutive slots of `slot_minutes`.
/// A trailing slot which does not fit completely is dropped. A slot is
/// unavailable when it intersects any of the `reserved` ranges.
pub fn compute_slots(
    window_start: Time,
    window_end: Time,
    slot_minutes: u16,
    reserved: &[(Time, Time)],
) -> Result<Arc<[TimeSlot]>, ServiceError> {
    if slot_minutes == 0 {
        return Err(ServiceError::ValidationError(Arc::new([
            ValidationFailureItem::InvalidValue("slot_minutes".into()),
        ])));
    }
    let step = u32::from(slot_minutes);
    let end = minutes_of_day(window_end);
    let mut start = minutes_of_day(window_start);
    let mut slots = Vec::new();
    while start + step <= end {
        let slot_start = time_from_minutes(start)?;
        let slot_end = time_from_minutes(start + step)?;
        let available = !reserved.iter().any(|(reserved_start, reserved_end)| {
            slot_start < *reserved_end && slot_end > *reserved_start
        });
        slots.push(TimeSlot {
            start_time: slot_start,
            end_time: slot_end,
            available,
        });
        start += step;
    }
    Ok(slots.into())
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait SlotService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Bookable slots of the employee on `date`. `slot_minutes` defaults to
    /// the configured slot duration. Only confirmed reservations occupy a
    /// slot. Computed on every call.
    async fn available_slots(
        &self,
        employee_id: Uuid,
        date: time::Date,
        slot_minutes: Option<u16>,
        window: SlotWindow,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[TimeSlot]>, ServiceError>;
}
