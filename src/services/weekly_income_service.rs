use anyhow::Result;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::warn;

use crate::models::{
    active_tier_for, rate_for_class_count, BreakdownKind, BreakdownRow, Client, IncomeRateTier,
    IncomeSummary, LateFee, Package, PricingTable, Session, Trainer, WeekBounds,
    WeeklyIncomeReport,
};
use crate::services::{IncomeRateService, PricingService};

/// Commission-rate bump for a session with a personal client, applied only
/// when the session's trainer is that client's primary trainer.
pub const PERSONAL_CLIENT_BONUS: f64 = 0.10;

/// Computes the weekly income view. All derived numbers are rebuilt from the
/// raw rows on every request; nothing here is cached or stored back.
#[derive(Clone)]
pub struct WeeklyIncomeService {
    db: PgPool,
    pricing: PricingService,
    income_rates: IncomeRateService,
}

impl WeeklyIncomeService {
    pub fn new(db: PgPool, pricing: PricingService) -> Self {
        let income_rates = IncomeRateService::new(db.clone());
        Self {
            db,
            pricing,
            income_rates,
        }
    }

    /// Full income report for the week containing `date`. None when the
    /// trainer does not exist.
    pub async fn weekly_report(
        &self,
        trainer_id: i64,
        date: NaiveDate,
    ) -> Result<Option<WeeklyIncomeReport>> {
        let week = WeekBounds::containing(date);

        let Some(trainer) =
            sqlx::query_as::<_, Trainer>("SELECT * FROM trainers WHERE id = $1")
                .bind(trainer_id)
                .fetch_optional(&self.db)
                .await?
        else {
            return Ok(None);
        };

        // Sessions may belong to clients whose primary trainer is someone
        // else, so names are resolved against the whole client list.
        let clients = sqlx::query_as::<_, Client>("SELECT * FROM clients")
            .fetch_all(&self.db)
            .await?;

        let packages = sqlx::query_as::<_, Package>(
            "SELECT * FROM packages WHERE trainer_id = $1",
        )
        .bind(trainer_id)
        .fetch_all(&self.db)
        .await?;

        let sessions = sqlx::query_as::<_, Session>(
            "SELECT * FROM sessions WHERE trainer_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(trainer_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.db)
        .await?;

        let late_fees = sqlx::query_as::<_, LateFee>(
            "SELECT * FROM late_fees WHERE trainer_id = $1 AND date BETWEEN $2 AND $3",
        )
        .bind(trainer_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.db)
        .await?;

        let rate_tiers = self.income_rates.tiers_for_week(trainer_id, week.start).await?;
        let pricing = self.pricing.table();

        Ok(Some(build_weekly_report(
            &trainer,
            &clients,
            &packages,
            &sessions,
            &late_fees,
            &rate_tiers,
            &pricing,
            week,
        )))
    }
}

/// Assemble the report from already-fetched rows. Pure: the whole income
/// computation is testable without a database.
///
/// `packages` must contain every package the trainer has (bound sessions may
/// reference purchases from months back); `sessions` and `late_fees` may be
/// supersets of the week, they are filtered here.
#[allow(clippy::too_many_arguments)]
pub fn build_weekly_report(
    trainer: &Trainer,
    clients: &[Client],
    packages: &[Package],
    sessions: &[Session],
    late_fees: &[LateFee],
    rate_tiers: &[IncomeRateTier],
    pricing: &PricingTable,
    week: WeekBounds,
) -> WeeklyIncomeReport {
    let client_for = |id: i64| clients.iter().find(|client| client.id == id);
    let name_for = |id: i64| {
        client_for(id)
            .map(|client| client.name.clone())
            .unwrap_or_else(|| format!("client #{id}"))
    };

    let week_sessions: Vec<&Session> = sessions
        .iter()
        .filter(|session| session.trainer_id == trainer.id && week.contains(session.date))
        .collect();
    let week_fees: Vec<&LateFee> = late_fees
        .iter()
        .filter(|fee| fee.trainer_id == trainer.id && week.contains(fee.date))
        .collect();

    let total_classes = week_sessions.len() as i64;
    let rate = rate_for_class_count(rate_tiers, total_classes);
    let active_tier = active_tier_for(rate_tiers, total_classes).cloned();

    let mut rows: Vec<BreakdownRow> = Vec::new();
    let mut bonus_income = 0.0;

    for package in packages
        .iter()
        .filter(|package| package.trainer_id == trainer.id && week.contains(package.start_date))
    {
        let client = client_for(package.client_id);
        let per_class = package_per_class_price(package, client, pricing, trainer.tier);
        rows.push(BreakdownRow {
            date: package.start_date,
            client_id: package.client_id,
            client_name: name_for(package.client_id),
            kind: BreakdownKind::Package,
            amount: f64::from(package.sessions_purchased) * per_class,
        });

        if let Some(bonus) = package.sales_bonus {
            bonus_income += bonus;
            rows.push(BreakdownRow {
                date: package.start_date,
                client_id: package.client_id,
                client_name: name_for(package.client_id),
                kind: BreakdownKind::SalesBonus,
                amount: bonus,
            });
        }
    }

    let mut class_income = 0.0;
    for session in &week_sessions {
        let client = client_for(session.client_id);
        let price = price_for_session(session, client, packages, pricing, trainer.tier);
        class_income += price * (rate + personal_rate_bonus(session, client));
        rows.push(BreakdownRow {
            date: session.date,
            client_id: session.client_id,
            client_name: name_for(session.client_id),
            kind: BreakdownKind::Class,
            amount: price,
        });
    }

    let mut late_fee_income = 0.0;
    for fee in &week_fees {
        late_fee_income += fee.amount;
        rows.push(BreakdownRow {
            date: fee.date,
            client_id: fee.client_id,
            client_name: name_for(fee.client_id),
            kind: BreakdownKind::LateFee,
            amount: fee.amount,
        });
    }

    rows.sort_by(|a, b| (a.date, &a.client_name).cmp(&(b.date, &b.client_name)));

    WeeklyIncomeReport {
        trainer_id: trainer.id,
        week_start: week.start,
        week_end: week.end,
        rows,
        summary: IncomeSummary {
            total_classes,
            rate,
            class_income,
            bonus_income,
            late_fee_income,
            final_weekly_income: class_income + bonus_income + late_fee_income,
        },
        active_tier,
    }
}

/// Gross per-class price for one delivered session.
///
/// A session bound to a package (and dated on or after its start) prices at
/// that package's volume bracket, under the package's mode, then the client's
/// default mode, then 1v1. Anything else is a drop-in: the 1-session bracket
/// under the session's own mode, then the client's, then 1v1. Client price
/// overrides beat the global table in both branches. A package_id pointing
/// nowhere degrades to drop-in.
pub fn price_for_session(
    session: &Session,
    client: Option<&Client>,
    packages: &[Package],
    pricing: &PricingTable,
    trainer_tier: i16,
) -> f64 {
    let bound = session
        .package_id
        .and_then(|id| packages.iter().find(|package| package.id == id));

    if session.package_id.is_some() && bound.is_none() {
        warn!(
            session_id = session.id,
            package_id = ?session.package_id,
            "session references a missing package, pricing as drop-in"
        );
    }

    match bound {
        Some(package) if session.date >= package.start_date => {
            package_per_class_price(package, client, pricing, trainer_tier)
        }
        _ => {
            let mode = session
                .mode
                .or(client.map(|c| c.mode))
                .unwrap_or_default();
            client
                .and_then(|c| c.price_per_class(1, mode))
                .unwrap_or_else(|| pricing.price_for(trainer_tier, 1, mode))
        }
    }
}

fn package_per_class_price(
    package: &Package,
    client: Option<&Client>,
    pricing: &PricingTable,
    trainer_tier: i16,
) -> f64 {
    let mode = package
        .mode
        .or(client.map(|c| c.mode))
        .unwrap_or_default();
    client
        .and_then(|c| c.price_per_class(package.sessions_purchased, mode))
        .unwrap_or_else(|| pricing.price_for(trainer_tier, package.sessions_purchased, mode))
}

fn personal_rate_bonus(session: &Session, client: Option<&Client>) -> f64 {
    match client {
        Some(client) if client.is_personal_client && session.trainer_id == client.trainer_id => {
            PERSONAL_CLIENT_BONUS
        }
        _ => 0.0,
    }
}
