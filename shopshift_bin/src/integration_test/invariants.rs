use proptest::prelude::*;
use rest::RestStateDef;
use rust_decimal::Decimal;
use service::employee::Employee;
use service::permission::Authentication;
use service::shift::{Shift, ShiftFilter, ShiftService, ShiftUpdate};
use service::weekly_stats::WeeklyStatsService;
use time::macros::date;
use time::{Date, Duration, Time};
use tokio::runtime::Runtime;

use crate::integration_test::TestSetup;

#[derive(Clone, Debug)]
enum ShiftOperation {
    Create {
        day: i64,
        start: u8,
        hours: u8,
        second_employee: bool,
    },
    Update {
        index: usize,
        day: Option<i64>,
        start: u8,
        hours: u8,
        reassign: bool,
    },
    Delete {
        index: usize,
    },
}

prop_compose! {
    /// A window inside the 09:00 to 17:00 opening hours.
    fn arb_window()(start in 9u8..17)(start in Just(start), hours in 1u8..=(17 - start)) -> (u8, u8) {
        (start, hours)
    }
}

/// Days of two consecutive weeks.
fn arb_day() -> impl Strategy<Value = i64> {
    0i64..14
}

fn arb_operation() -> impl Strategy<Value = ShiftOperation> {
    prop_oneof![
        3 => (arb_day(), arb_window(), any::<bool>()).prop_map(
            |(day, (start, hours), second_employee)| ShiftOperation::Create {
                day,
                start,
                hours,
                second_employee,
            }
        ),
        2 => (any::<usize>(), prop::option::of(arb_day()), arb_window(), any::<bool>()).prop_map(
            |(index, day, (start, hours), reassign)| ShiftOperation::Update {
                index,
                day,
                start,
                hours,
                reassign,
            }
        ),
        1 => any::<usize>().prop_map(|index| ShiftOperation::Delete { index }),
    ]
}

fn clock(hour: u8) -> Time {
    Time::from_hms(hour, 0, 0).unwrap()
}

fn sum_where(shifts: &[Shift], keep: impl Fn(&Shift) -> bool) -> (Decimal, Decimal) {
    shifts
        .iter()
        .filter(|shift| keep(shift))
        .fold((Decimal::ZERO, Decimal::ZERO), |(hours, cost), shift| {
            (hours + shift.hours, cost + shift.cost)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]
    #[test]
    fn test_aggregates_follow_live_shifts(
        operations in prop::collection::vec(arb_operation(), 1..12)
    ) {
        Runtime::new().unwrap().block_on(async {
            let test_setup = TestSetup::new().await;
            let store = test_setup.create_store(Decimal::from(1_000_000)).await;
            let employees: [Employee; 2] = [
                test_setup
                    .create_employee(store.id, "jane@example.com", Decimal::from(1000), Decimal::new(1750, 2))
                    .await,
                test_setup
                    .create_employee(store.id, "sam@example.com", Decimal::from(1000), Decimal::from(22))
                    .await,
            ];
            let monday = date!(2024 - 06 - 10);
            let weeks: [Date; 2] = [monday, monday + Duration::days(7)];
            let shift_service = test_setup.rest_state.shift_service();
            let weekly_stats_service = test_setup.rest_state.weekly_stats_service();
            // Updates only move shifts into weeks which already have stats.
            for week in weeks {
                weekly_stats_service
                    .get_for_week(store.id, Some(week), Authentication::Full, None)
                    .await
                    .unwrap();
            }

            let mut live: Vec<Shift> = vec![];
            for operation in operations {
                match operation {
                    ShiftOperation::Create { day, start, hours, second_employee } => {
                        let shift = test_setup
                            .create_shift(
                                &employees[usize::from(second_employee)],
                                monday + Duration::days(day),
                                clock(start),
                                clock(start + hours),
                            )
                            .await
                            .unwrap();
                        live.push(shift);
                    }
                    ShiftOperation::Update { index, day, start, hours, reassign } if !live.is_empty() => {
                        let index = index % live.len();
                        let employee_id = reassign.then(|| {
                            if live[index].employee_id == employees[0].id {
                                employees[1].id
                            } else {
                                employees[0].id
                            }
                        });
                        let updated = shift_service
                            .update(
                                live[index].id,
                                &ShiftUpdate {
                                    employee_id,
                                    date: day.map(|day| monday + Duration::days(day)),
                                    start_time: Some(clock(start)),
                                    end_time: Some(clock(start + hours)),
                                    ..Default::default()
                                },
                                Authentication::Full,
                                None,
                            )
                            .await
                            .unwrap();
                        live[index] = updated;
                    }
                    ShiftOperation::Delete { index } if !live.is_empty() => {
                        let shift = live.remove(index % live.len());
                        shift_service
                            .delete(shift.id, Authentication::Full, None)
                            .await
                            .unwrap();
                    }
                    _ => {}
                }
            }

            let stored = shift_service
                .get_all(
                    &ShiftFilter {
                        store_id: Some(store.id),
                        ..Default::default()
                    },
                    Authentication::Full,
                    None,
                )
                .await
                .unwrap();
            assert_eq!(stored.len(), live.len());

            for employee in &employees {
                let (hours, _) = sum_where(&stored, |shift| shift.employee_id == employee.id);
                assert_eq!(test_setup.employee(employee.id).await.current_hours, hours);
            }

            for week in weeks {
                let stats = weekly_stats_service
                    .get_for_week(store.id, Some(week), Authentication::Full, None)
                    .await
                    .unwrap();
                let (hours, cost) = sum_where(&stored, |shift| {
                    stats.week_start <= shift.date && shift.date <= stats.week_end
                });
                assert_eq!(stats.total_hours, hours);
                assert_eq!(stats.total_cost, cost);
                assert_eq!(stats.budget_remaining, stats.budget_allocated - stats.total_cost);
            }
        });
    }
}
