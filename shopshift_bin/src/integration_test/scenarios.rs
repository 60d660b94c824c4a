use rest::RestStateDef;
use rust_decimal::Decimal;
use service::employee::EmployeeService;
use service::permission::{Actor, ActorRole, Authentication};
use service::reservation::{
    ReservationDuration, ReservationQuery, ReservationRequest, ReservationService,
    ReservationStatus,
};
use service::shift::ShiftService;
use service::slot::{SlotService, SlotWindow};
use service::weekly_stats::WeeklyStatsService;
use service::ServiceError;
use time::macros::{date, time};

use crate::integration_test::TestSetup;

fn booking(employee_id: uuid::Uuid, email: &str, phone: &str) -> ReservationRequest {
    ReservationRequest {
        employee_id,
        name: Some("Alex Smith".into()),
        email: email.into(),
        phone: phone.into(),
        date: date!(2024 - 06 - 10),
        start_time: time!(10:00),
        duration: ReservationDuration::Minutes60,
        notes: None,
    }
}

#[tokio::test]
async fn test_shift_updates_employee_hours_and_weekly_budget() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "jane@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;

    let shift = test_setup
        .create_shift(&employee, date!(2024 - 06 - 10), time!(09:00), time!(13:00))
        .await
        .unwrap();
    assert_eq!(shift.hours, Decimal::from(4));
    assert_eq!(shift.cost, Decimal::from(80));

    assert_eq!(
        test_setup.employee(employee.id).await.current_hours,
        Decimal::from(4)
    );
    let stats = test_setup
        .rest_state
        .weekly_stats_service()
        .get_for_week(store.id, Some(date!(2024 - 06 - 12)), Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(stats.week_start, date!(2024 - 06 - 10));
    assert_eq!(stats.total_hours, Decimal::from(4));
    assert_eq!(stats.total_cost, Decimal::from(80));
    assert_eq!(stats.budget_remaining, Decimal::from(920));

    // Closing time is 17:00.
    let result = test_setup
        .create_shift(&employee, date!(2024 - 06 - 11), time!(13:00), time!(22:00))
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::InvalidShiftWindow(_, _, _, _))
    ));
    assert_eq!(
        test_setup.employee(employee.id).await.current_hours,
        Decimal::from(4)
    );
    let stats = test_setup
        .rest_state
        .weekly_stats_service()
        .get_for_week(store.id, Some(date!(2024 - 06 - 10)), Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(stats.total_cost, Decimal::from(80));

    let confirmation = test_setup
        .rest_state
        .shift_service()
        .delete(shift.id, Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(confirmation.id, shift.id);
    assert_eq!(
        test_setup.employee(employee.id).await.current_hours,
        Decimal::ZERO
    );
    let stats = test_setup
        .rest_state
        .weekly_stats_service()
        .get_for_week(store.id, Some(date!(2024 - 06 - 10)), Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(stats.total_cost, Decimal::ZERO);
    assert_eq!(stats.total_hours, Decimal::ZERO);
    assert_eq!(stats.budget_remaining, Decimal::from(1000));
}

#[tokio::test]
async fn test_max_hours_guard_keeps_current_hours() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "sam@example.com",
            Decimal::from(10),
            Decimal::from(20),
        )
        .await;
    test_setup
        .rest_state
        .employee_service()
        .add_current_hours(employee.id, Decimal::from(8), Authentication::Full, None)
        .await
        .unwrap();

    let result = test_setup
        .create_shift(&employee, date!(2024 - 06 - 12), time!(09:00), time!(13:00))
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::MaxHoursExceeded(_, _, _))
    ));
    assert_eq!(
        test_setup.employee(employee.id).await.current_hours,
        Decimal::from(8)
    );
}

#[tokio::test]
async fn test_budget_guard_rolls_back() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(100)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "kim@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;
    test_setup
        .create_shift(&employee, date!(2024 - 06 - 10), time!(09:00), time!(13:00))
        .await
        .unwrap();

    let result = test_setup
        .create_shift(&employee, date!(2024 - 06 - 11), time!(09:00), time!(11:00))
        .await;
    assert!(matches!(result, Err(ServiceError::BudgetExceeded(_, _))));
    assert_eq!(
        test_setup.employee(employee.id).await.current_hours,
        Decimal::from(4)
    );
    let shifts = test_setup
        .rest_state
        .shift_service()
        .get_weekly(
            Some(store.id),
            Some(date!(2024 - 06 - 14)),
            Authentication::Full,
            None,
        )
        .await
        .unwrap();
    assert_eq!(shifts.len(), 1);
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "jane@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;
    let reservation_service = test_setup.rest_state.reservation_service();

    let first = reservation_service
        .create(
            &booking(employee.id, "alex@example.com", "555-123-4567"),
            Authentication::Context(None),
            None,
        )
        .await
        .unwrap();
    assert_eq!(first.end_time, time!(11:00));
    assert_eq!(first.status, ReservationStatus::Confirmed);

    let second = ReservationRequest {
        start_time: time!(10:30),
        ..booking(employee.id, "robin@example.com", "555-987-6543")
    };
    let result = reservation_service
        .create(&second, Authentication::Context(None), None)
        .await;
    assert!(matches!(result, Err(ServiceError::SlotUnavailable(_, _, _))));

    reservation_service
        .cancel(first.id, Authentication::Full, None)
        .await
        .unwrap();
    let rebooked = reservation_service
        .create(&second, Authentication::Context(None), None)
        .await
        .unwrap();
    assert_eq!(rebooked.start_time, time!(10:30));
}

#[tokio::test]
async fn test_phone_format_is_enforced() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "jane@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;
    let reservation_service = test_setup.rest_state.reservation_service();

    let result = reservation_service
        .create(
            &booking(employee.id, "alex@example.com", "5551234567"),
            Authentication::Context(None),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::InvalidPhone(_))));

    let reservation = reservation_service
        .create(
            &booking(employee.id, "alex@example.com", "555-123-4567"),
            Authentication::Context(None),
            None,
        )
        .await
        .unwrap();

    // The booking created the customer, who can see it.
    let customer = Actor::new(Some(reservation.customer_id), ActorRole::Customer);
    let visible = reservation_service
        .get_reservations(
            &ReservationQuery::default(),
            Authentication::Context(Some(customer)),
            None,
        )
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, reservation.id);
}

#[tokio::test]
async fn test_confirmed_reservation_occupies_slots() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "jane@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;
    test_setup
        .create_shift(&employee, date!(2024 - 06 - 10), time!(09:00), time!(13:00))
        .await
        .unwrap();
    test_setup
        .rest_state
        .reservation_service()
        .create(
            &booking(employee.id, "alex@example.com", "555-123-4567"),
            Authentication::Context(None),
            None,
        )
        .await
        .unwrap();

    let slots = test_setup
        .rest_state
        .slot_service()
        .available_slots(
            employee.id,
            date!(2024 - 06 - 10),
            Some(30),
            SlotWindow::Shift,
            Authentication::Context(None),
            None,
        )
        .await
        .unwrap();
    assert_eq!(slots.len(), 8);
    let taken: Vec<time::Time> = slots
        .iter()
        .filter(|slot| !slot.available)
        .map(|slot| slot.start_time)
        .collect();
    assert_eq!(taken, vec![time!(10:00), time!(10:30)]);

    let result = test_setup
        .rest_state
        .slot_service()
        .available_slots(
            employee.id,
            date!(2024 - 06 - 11),
            Some(30),
            SlotWindow::Shift,
            Authentication::Context(None),
            None,
        )
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::ShiftNotFoundOnDate(_, _))
    ));
}

#[tokio::test]
async fn test_employee_with_shifts_cannot_be_deleted() {
    let test_setup = TestSetup::new().await;
    let store = test_setup.create_store(Decimal::from(1000)).await;
    let employee = test_setup
        .create_employee(
            store.id,
            "jane@example.com",
            Decimal::from(40),
            Decimal::from(20),
        )
        .await;
    let shift = test_setup
        .create_shift(&employee, date!(2024 - 06 - 10), time!(09:00), time!(13:00))
        .await
        .unwrap();
    let employee_service = test_setup.rest_state.employee_service();

    let result = employee_service
        .delete(employee.id, Authentication::Full, None)
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::EmployeeHasShifts(_, 1))
    ));

    test_setup
        .rest_state
        .shift_service()
        .delete(shift.id, Authentication::Full, None)
        .await
        .unwrap();
    let stats = test_setup
        .rest_state
        .weekly_stats_service()
        .get_for_week(store.id, Some(date!(2024 - 06 - 10)), Authentication::Full, None)
        .await
        .unwrap();
    assert_eq!(stats.total_cost, Decimal::ZERO);

    employee_service
        .delete(employee.id, Authentication::Full, None)
        .await
        .unwrap();
}
