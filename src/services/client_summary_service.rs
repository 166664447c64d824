use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::{Client, ClientRow, Package, Session, WeekBounds};

/// Builds the per-client dashboard rows: purchased / used / remaining for the
/// packages worth showing, plus this week's class count.
#[derive(Clone)]
pub struct ClientSummaryService {
    db: PgPool,
}

impl ClientSummaryService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// One row per active client the trainer works with (primary or
    /// secondary), ordered by client name.
    pub async fn rows_for_trainer(
        &self,
        trainer_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ClientRow>> {
        let week = WeekBounds::containing(date);

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT * FROM clients
            WHERE (trainer_id = $1 OR secondary_trainer_id = $1) AND is_active
            ORDER BY name
            "#,
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        let mut rows = Vec::with_capacity(clients.len());
        for client in &clients {
            let packages = sqlx::query_as::<_, Package>(
                "SELECT * FROM packages WHERE client_id = $1",
            )
            .bind(client.id)
            .fetch_all(&self.db)
            .await?;

            let sessions = sqlx::query_as::<_, Session>(
                "SELECT * FROM sessions WHERE client_id = $1",
            )
            .bind(client.id)
            .fetch_all(&self.db)
            .await?;

            rows.push(summarize_client(client, &packages, &sessions, week));
        }

        Ok(rows)
    }
}

/// Compress a client's package history into one display row. Pure.
///
/// Packages are considered in (start_date, id) order. The row shows:
/// - up to the last two packages that still have remaining capacity, older
///   first, with capacities concatenated ("10 + 5");
/// - failing that, the single most recent package, whose remaining may be
///   zero or negative (rebalancing can overfill a package and that deficit
///   is surfaced, not hidden);
/// - failing that, "0" purchased with the lifetime session count as a
///   negative remaining, so pure drop-in clients read as a deficit.
///
/// "Used" counts sessions bound to the shown packages across all time;
/// `week_count` is the client's sessions inside the target week.
pub fn summarize_client(
    client: &Client,
    packages: &[Package],
    sessions: &[Session],
    week: WeekBounds,
) -> ClientRow {
    let mut owned: Vec<&Package> = packages
        .iter()
        .filter(|package| package.client_id == client.id)
        .collect();
    owned.sort_by_key(|package| (package.start_date, package.id));

    let client_sessions: Vec<&Session> = sessions
        .iter()
        .filter(|session| session.client_id == client.id)
        .collect();
    let used_of = |package_id: i64| -> i64 {
        client_sessions
            .iter()
            .filter(|session| session.package_id == Some(package_id))
            .count() as i64
    };
    let week_count = client_sessions
        .iter()
        .filter(|session| week.contains(session.date))
        .count() as i64;

    let active: Vec<&Package> = owned
        .iter()
        .copied()
        .filter(|package| used_of(package.id) < i64::from(package.sessions_purchased))
        .collect();

    let shown: Vec<&Package> = if !active.is_empty() {
        active[active.len().saturating_sub(2)..].to_vec()
    } else if let Some(last) = owned.last() {
        vec![*last]
    } else {
        Vec::new()
    };

    if shown.is_empty() {
        let lifetime = client_sessions.len() as i64;
        return ClientRow {
            client_id: client.id,
            client_name: client.name.clone(),
            mode: client.mode,
            is_personal_client: client.is_personal_client,
            purchased: "0".to_string(),
            used: lifetime,
            remaining: -lifetime,
            week_count,
        };
    }

    let purchased_total: i64 = shown
        .iter()
        .map(|package| i64::from(package.sessions_purchased))
        .sum();
    let used: i64 = shown.iter().map(|package| used_of(package.id)).sum();
    let purchased = shown
        .iter()
        .map(|package| package.sessions_purchased.to_string())
        .collect::<Vec<_>>()
        .join(" + ");

    ClientRow {
        client_id: client.id,
        client_name: client.name.clone(),
        mode: client.mode,
        is_personal_client: client.is_personal_client,
        purchased,
        used,
        remaining: purchased_total - used,
        week_count,
    }
}
