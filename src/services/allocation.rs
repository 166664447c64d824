use chrono::NaiveDate;

use crate::models::{Package, Session};

/// Pure package-selection logic, shared by session logging and package
/// deletion. No I/O, no mutation: callers fetch the rows, this decides.
///
/// The two policies are deliberately asymmetric: new sessions drain the
/// OLDEST eligible package first, while sessions orphaned by a deletion
/// attach to the NEWEST surviving package.
pub struct PackageAllocator;

impl PackageAllocator {
    /// Sessions currently bound to a package, lifetime across all time.
    pub fn sessions_bound(package_id: i64, sessions: &[Session]) -> usize {
        sessions
            .iter()
            .filter(|session| session.package_id == Some(package_id))
            .count()
    }

    /// Remaining capacity of a package given the sessions bound to it.
    /// Negative when rebalancing or external correction overfilled it.
    pub fn remaining_capacity(package: &Package, sessions: &[Session]) -> i64 {
        i64::from(package.sessions_purchased) - Self::sessions_bound(package.id, sessions) as i64
    }

    /// Package that should absorb a session for (client, trainer) on `date`.
    ///
    /// Eligible packages - same pair, start_date on or before the session
    /// date - are tried oldest first (ties broken by lower id), and the first
    /// one with remaining capacity wins. None means the session stays
    /// unpackaged; the caller decides whether that is a drop-in or a failure.
    ///
    /// Batch callers must fold each session they create into the `sessions`
    /// view before the next pick, or a batch could double-spend a package's
    /// last slot.
    pub fn pick_package_for_session<'a>(
        client_id: i64,
        trainer_id: i64,
        date: NaiveDate,
        packages: &'a [Package],
        sessions: &[Session],
    ) -> Option<&'a Package> {
        let mut eligible: Vec<&Package> = packages
            .iter()
            .filter(|package| {
                package.client_id == client_id
                    && package.trainer_id == trainer_id
                    && package.start_date <= date
            })
            .collect();
        eligible.sort_by_key(|package| (package.start_date, package.id));

        eligible
            .into_iter()
            .find(|package| Self::remaining_capacity(package, sessions) > 0)
    }

    /// Where a deleted package's sessions go: the most recent surviving
    /// package for the same (client, trainer) pair, by (start_date, id).
    /// Capacity is deliberately not re-checked - orphaned sessions must land
    /// somewhere rather than be lost, even if that overfills the target.
    pub fn rebalance_target<'a>(
        survivors: &'a [Package],
        client_id: i64,
        trainer_id: i64,
    ) -> Option<&'a Package> {
        survivors
            .iter()
            .filter(|package| package.client_id == client_id && package.trainer_id == trainer_id)
            .max_by_key(|package| (package.start_date, package.id))
    }
}
