//! Allocator and rebalancer behavior over in-memory rows: FIFO drain order,
//! capacity enforcement across a batch, and the deliberately asymmetric
//! rebalance-to-newest policy.

use chrono::{Duration, NaiveDate, Utc};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use gym_desk::models::{Package, Session};
use gym_desk::services::PackageAllocator;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn package(id: i64, client_id: i64, start: NaiveDate, capacity: i32) -> Package {
    Package {
        id,
        client_id,
        trainer_id: 1,
        sessions_purchased: capacity,
        start_date: start,
        sales_bonus: None,
        mode: None,
        location: None,
        created_at: Utc::now(),
    }
}

fn session(id: i64, client_id: i64, on: NaiveDate, package_id: Option<i64>) -> Session {
    Session {
        id,
        date: on,
        trainer_id: 1,
        client_id,
        package_id,
        mode: None,
        location_override: None,
        created_at: Utc::now(),
    }
}

/// Allocate one session per date the way the session service does it: every
/// created session is folded into the ledger before the next pick.
fn allocate_batch(
    client_id: i64,
    dates: &[NaiveDate],
    packages: &[Package],
    ledger: &mut Vec<Session>,
) -> Vec<Option<i64>> {
    dates
        .iter()
        .map(|&on| {
            let picked =
                PackageAllocator::pick_package_for_session(client_id, 1, on, packages, ledger)
                    .map(|p| p.id);
            let next_id = ledger.len() as i64 + 1;
            ledger.push(session(next_id, client_id, on, picked));
            picked
        })
        .collect()
}

#[test]
fn batch_drains_the_old_package_before_touching_the_new_one() {
    let packages = vec![
        package(1, 1, date(2025, 1, 6), 2),
        package(2, 1, date(2025, 2, 3), 10),
    ];
    let mut ledger = Vec::new();

    let dates: Vec<NaiveDate> = (0..4).map(|i| date(2025, 2, 10) + Duration::days(i)).collect();
    let picks = allocate_batch(1, &dates, &packages, &mut ledger);

    assert_eq!(picks, vec![Some(1), Some(1), Some(2), Some(2)]);
}

#[test]
fn batch_cannot_double_spend_the_last_slot() {
    let packages = vec![package(1, 1, date(2025, 1, 6), 1)];
    let mut ledger = Vec::new();

    let picks = allocate_batch(
        1,
        &[date(2025, 1, 7), date(2025, 1, 8), date(2025, 1, 9)],
        &packages,
        &mut ledger,
    );

    assert_eq!(picks, vec![Some(1), None, None]);
}

#[test]
fn sessions_before_a_packages_start_never_consume_it() {
    let packages = vec![package(1, 1, date(2025, 3, 1), 10)];
    let mut ledger = Vec::new();

    // two drop-ins before the package starts, then one covered class
    let picks = allocate_batch(
        1,
        &[date(2025, 2, 20), date(2025, 2, 27), date(2025, 3, 1)],
        &packages,
        &mut ledger,
    );

    assert_eq!(picks, vec![None, None, Some(1)]);
    assert_eq!(PackageAllocator::remaining_capacity(&packages[0], &ledger), 9);
}

#[test]
fn interleaved_clients_consume_their_own_packages() {
    let packages = vec![
        package(1, 1, date(2025, 1, 6), 1),
        package(2, 2, date(2025, 1, 6), 1),
    ];
    let mut ledger = Vec::new();

    let first = allocate_batch(1, &[date(2025, 1, 7)], &packages, &mut ledger);
    let second = allocate_batch(2, &[date(2025, 1, 7)], &packages, &mut ledger);
    let third = allocate_batch(1, &[date(2025, 1, 8)], &packages, &mut ledger);

    assert_eq!(first, vec![Some(1)]);
    assert_eq!(second, vec![Some(2)]);
    // client 1's package is spent; client 2's remaining slot is not theirs
    assert_eq!(third, vec![None]);
}

#[test]
fn rebalance_target_is_the_newest_by_start_date_then_id() {
    let survivors = vec![
        package(4, 1, date(2025, 2, 3), 5),
        package(2, 1, date(2025, 3, 3), 5),
        package(3, 1, date(2025, 3, 3), 5),
    ];

    let target = PackageAllocator::rebalance_target(&survivors, 1, 1);
    // 2025-03-03 twins: the higher id is the later purchase
    assert_eq!(target.map(|p| p.id), Some(3));
}

#[test]
fn rebalance_and_allocation_disagree_on_purpose() {
    let packages = vec![
        package(1, 1, date(2025, 1, 6), 10),
        package(2, 1, date(2025, 2, 3), 10),
    ];

    let allocated =
        PackageAllocator::pick_package_for_session(1, 1, date(2025, 2, 10), &packages, &[]);
    let rebalanced = PackageAllocator::rebalance_target(&packages, 1, 1);

    // new sessions drain the oldest package, orphans attach to the newest
    assert_eq!(allocated.map(|p| p.id), Some(1));
    assert_eq!(rebalanced.map(|p| p.id), Some(2));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The allocator never picks a package that starts after the session
    /// date, never picks a full one, and always prefers the earliest
    /// (start_date, id) among the eligible candidates with room.
    #[test]
    fn pick_respects_eligibility_capacity_and_fifo(
        specs in prop::collection::vec((0i64..60, 1i32..6), 1..8),
        bound in prop::collection::vec(any::<prop::sample::Index>(), 0..12),
        day_offset in 0i64..60,
    ) {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let packages: Vec<Package> = specs
            .iter()
            .enumerate()
            .map(|(i, &(offset, capacity))| {
                package(i as i64 + 1, 1, base + Duration::days(offset), capacity)
            })
            .collect();

        // bind sessions to arbitrary packages, capped at each one's capacity
        let mut sessions = Vec::new();
        for index in &bound {
            let target = index.get(&packages);
            if PackageAllocator::remaining_capacity(target, &sessions) > 0 {
                let id = sessions.len() as i64 + 1;
                sessions.push(session(id, 1, target.start_date, Some(target.id)));
            }
        }

        let on = base + Duration::days(day_offset);
        let picked = PackageAllocator::pick_package_for_session(1, 1, on, &packages, &sessions);

        match picked {
            Some(chosen) => {
                prop_assert!(chosen.start_date <= on);
                prop_assert!(PackageAllocator::remaining_capacity(chosen, &sessions) > 0);
                for candidate in &packages {
                    if candidate.start_date <= on
                        && PackageAllocator::remaining_capacity(candidate, &sessions) > 0
                    {
                        prop_assert!(
                            (chosen.start_date, chosen.id)
                                <= (candidate.start_date, candidate.id)
                        );
                    }
                }
            }
            None => {
                for candidate in &packages {
                    prop_assert!(
                        candidate.start_date > on
                            || PackageAllocator::remaining_capacity(candidate, &sessions) <= 0
                    );
                }
            }
        }
    }

    /// Identical inputs give identical picks.
    #[test]
    fn pick_is_idempotent(
        specs in prop::collection::vec((0i64..30, 1i32..4), 1..6),
        day_offset in 0i64..30,
    ) {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let packages: Vec<Package> = specs
            .iter()
            .enumerate()
            .map(|(i, &(offset, capacity))| {
                package(i as i64 + 1, 1, base + Duration::days(offset), capacity)
            })
            .collect();
        let on = base + Duration::days(day_offset);

        let first =
            PackageAllocator::pick_package_for_session(1, 1, on, &packages, &[]).map(|p| p.id);
        let second =
            PackageAllocator::pick_package_for_session(1, 1, on, &packages, &[]).map(|p| p.id);
        prop_assert_eq!(first, second);
    }

    /// A full batch never binds more sessions to a package than it holds.
    #[test]
    fn batch_allocation_never_overfills(
        specs in prop::collection::vec((0i64..20, 1i32..4), 1..5),
        day_offsets in prop::collection::vec(0i64..40, 1..15),
    ) {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let packages: Vec<Package> = specs
            .iter()
            .enumerate()
            .map(|(i, &(offset, capacity))| {
                package(i as i64 + 1, 1, base + Duration::days(offset), capacity)
            })
            .collect();
        let dates: Vec<NaiveDate> =
            day_offsets.iter().map(|&d| base + Duration::days(d)).collect();

        let mut ledger = Vec::new();
        allocate_batch(1, &dates, &packages, &mut ledger);

        for package in &packages {
            prop_assert!(PackageAllocator::remaining_capacity(package, &ledger) >= 0);
        }
    }
}
