//! Weekly aggregator scenarios over in-memory rows: pricing resolution,
//! commission rates, the personal-client bump, and breakdown-row ordering.
//! No database involved; this is the pure heart of the income view.

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;

use gym_desk::models::{
    BreakdownKind, Client, IncomeRateTier, LateFee, Package, PricingRow, PricingTable, Session,
    Trainer, TrainingMode, WeekBounds,
};
use gym_desk::services::build_weekly_report;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// week under test: Monday 2025-03-03 through Sunday 2025-03-09
fn week() -> WeekBounds {
    WeekBounds::containing(date(2025, 3, 5))
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

fn trainer(id: i64, tier: i16) -> Trainer {
    Trainer {
        id,
        name: format!("Trainer {id}"),
        tier,
        email: None,
        is_active: true,
        location: None,
        created_at: Utc::now(),
    }
}

fn client(id: i64, name: &str, trainer_id: i64) -> Client {
    Client {
        id,
        name: name.to_string(),
        trainer_id,
        secondary_trainer_id: None,
        mode: TrainingMode::OneOnOne,
        price_1_12: None,
        price_13_20: None,
        price_21_plus: None,
        mode_premium: None,
        is_active: true,
        is_personal_client: false,
        location: None,
        created_at: Utc::now(),
    }
}

fn package(id: i64, client_id: i64, trainer_id: i64, start: NaiveDate, capacity: i32) -> Package {
    Package {
        id,
        client_id,
        trainer_id,
        sessions_purchased: capacity,
        start_date: start,
        sales_bonus: None,
        mode: None,
        location: None,
        created_at: Utc::now(),
    }
}

fn session(id: i64, client_id: i64, trainer_id: i64, on: NaiveDate, package_id: Option<i64>) -> Session {
    Session {
        id,
        date: on,
        trainer_id,
        client_id,
        package_id,
        mode: None,
        location_override: None,
        created_at: Utc::now(),
    }
}

fn late_fee(id: i64, client_id: i64, trainer_id: i64, on: NaiveDate, amount: f64) -> LateFee {
    LateFee {
        id,
        client_id,
        trainer_id,
        date: on,
        amount,
        created_at: Utc::now(),
    }
}

/// The stock table: tier 1 prices 150/140/130 with a $20 1v2 premium, and so
/// on down the tiers.
fn pricing() -> PricingTable {
    let prices: [(i16, [f64; 3]); 3] = [
        (1, [150.0, 140.0, 130.0]),
        (2, [130.0, 120.0, 110.0]),
        (3, [110.0, 100.0, 90.0]),
    ];
    let mut rows = Vec::new();
    for (tier, tier_prices) in prices {
        for (i, (min, max)) in [(1, Some(12)), (13, Some(20)), (21, None)].into_iter().enumerate() {
            rows.push(PricingRow {
                id: rows.len() as i64 + 1,
                tier,
                sessions_min: min,
                sessions_max: max,
                price: tier_prices[i],
                mode_1v2_premium: 20.0,
            });
        }
    }
    PricingTable::new(rows)
}

fn rate_tiers(trainer_id: i64) -> Vec<IncomeRateTier> {
    vec![
        IncomeRateTier {
            id: 1,
            trainer_id,
            min_classes: 1,
            max_classes: Some(12),
            rate: 0.46,
            effective_from: date(2025, 1, 1),
        },
        IncomeRateTier {
            id: 2,
            trainer_id,
            min_classes: 13,
            max_classes: None,
            rate: 0.51,
            effective_from: date(2025, 1, 1),
        },
    ]
}

#[test]
fn full_week_totals_add_up() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);
    let mut bo = client(2, "Bo", 1);
    bo.is_personal_client = true;

    let mut pack = package(1, 1, 1, date(2025, 3, 3), 10);
    pack.sales_bonus = Some(50.0);

    let sessions = vec![
        session(1, 1, 1, date(2025, 3, 3), Some(1)),
        session(2, 1, 1, date(2025, 3, 4), Some(1)),
        session(3, 1, 1, date(2025, 3, 5), Some(1)),
        session(4, 2, 1, date(2025, 3, 6), None),
        session(5, 2, 1, date(2025, 3, 7), None),
    ];
    let fees = vec![late_fee(1, 1, 1, date(2025, 3, 4), 25.0)];

    let report = build_weekly_report(
        &trainer,
        &[dana, bo],
        &[pack],
        &sessions,
        &fees,
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    let summary = &report.summary;
    assert_eq!(summary.total_classes, 5);
    assert_eq!(summary.rate, 0.46);
    // Dana: 3 classes at 150 (10-pack bracket) on the base rate;
    // Bo: 2 personal drop-ins at 150 on rate + 0.10
    assert!(close(summary.class_income, 3.0 * 150.0 * 0.46 + 2.0 * 150.0 * 0.56));
    assert!(close(summary.bonus_income, 50.0));
    assert!(close(summary.late_fee_income, 25.0));
    assert!(close(
        summary.final_weekly_income,
        summary.class_income + summary.bonus_income + summary.late_fee_income
    ));

    // one purchase row, one bonus row, five classes, one fee
    assert_eq!(report.rows.len(), 8);
    let purchase = report
        .rows
        .iter()
        .find(|row| row.kind == BreakdownKind::Package)
        .unwrap();
    assert!(close(purchase.amount, 10.0 * 150.0));
    assert_eq!(report.active_tier.as_ref().map(|t| t.min_classes), Some(1));
}

#[test]
fn rows_sort_by_date_then_client_name_regardless_of_input_order() {
    let trainer = trainer(1, 1);
    let zoe = client(1, "Zoe", 1);
    let ada = client(2, "Ada", 1);

    // deliberately shuffled: latest date first, Zoe before Ada
    let sessions = vec![
        session(1, 1, 1, date(2025, 3, 5), None),
        session(2, 2, 1, date(2025, 3, 5), None),
        session(3, 1, 1, date(2025, 3, 3), None),
        session(4, 2, 1, date(2025, 3, 3), None),
    ];
    let fees = vec![late_fee(1, 2, 1, date(2025, 3, 3), 10.0)];

    let report = build_weekly_report(
        &trainer,
        &[zoe, ada],
        &[],
        &sessions,
        &fees,
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    let order: Vec<(NaiveDate, String)> = report
        .rows
        .iter()
        .map(|row| (row.date, row.client_name.clone()))
        .collect();
    let mut expected = order.clone();
    expected.sort();
    assert_eq!(order, expected);

    // Ada's class and late fee on the 3rd cluster before Zoe's class
    assert_eq!(report.rows[0].client_name, "Ada");
    assert_eq!(report.rows[1].client_name, "Ada");
    assert_eq!(report.rows[2].client_name, "Zoe");
}

#[test]
fn personal_bonus_applies_only_to_the_primary_trainers_sessions() {
    let primary = trainer(1, 1);
    let secondary = trainer(2, 1);
    let mut kim = client(1, "Kim", 1);
    kim.secondary_trainer_id = Some(2);
    kim.is_personal_client = true;

    let for_primary = build_weekly_report(
        &primary,
        std::slice::from_ref(&kim),
        &[],
        &[session(1, 1, 1, date(2025, 3, 3), None)],
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );
    let for_secondary = build_weekly_report(
        &secondary,
        std::slice::from_ref(&kim),
        &[],
        &[session(2, 1, 2, date(2025, 3, 3), None)],
        &[],
        &rate_tiers(2),
        &pricing(),
        week(),
    );

    assert!(close(for_primary.summary.class_income, 150.0 * 0.56));
    assert!(close(for_secondary.summary.class_income, 150.0 * 0.46));
}

#[test]
fn bound_sessions_price_by_the_packages_bracket() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);
    // a 15-pack prices each class at the 13-20 bracket
    let pack = package(1, 1, 1, date(2025, 1, 6), 15);

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[pack],
        &[session(1, 1, 1, date(2025, 3, 3), Some(1))],
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    assert!(close(report.rows[0].amount, 140.0));
    // the package itself was purchased months ago: no purchase row this week
    assert_eq!(report.rows.len(), 1);
}

#[test]
fn dangling_package_reference_degrades_to_drop_in() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[],
        &[session(1, 1, 1, date(2025, 3, 3), Some(999))],
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    // 1-session bracket, not a crash
    assert!(close(report.rows[0].amount, 150.0));
}

#[test]
fn session_dated_before_its_packages_start_prices_as_drop_in() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);
    // rebalancing can leave a session bound to a package that starts later
    let pack = package(1, 1, 1, date(2025, 3, 7), 15);

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[pack],
        &[session(1, 1, 1, date(2025, 3, 3), Some(1))],
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    // 150 at the 1-session bracket, not 140 at the package's bracket
    let class_row = report
        .rows
        .iter()
        .find(|row| row.kind == BreakdownKind::Class)
        .unwrap();
    assert!(close(class_row.amount, 150.0));
}

#[test]
fn mode_premium_flows_through_package_and_session_pricing() {
    let trainer = trainer(1, 1);
    let mut pair_client = client(1, "Pair", 1);
    pair_client.mode = TrainingMode::OneOnTwo;

    let mut shared = client(2, "Shared", 1);
    shared.mode = TrainingMode::TwoOnTwo;

    let mut pack = package(1, 1, 1, date(2025, 1, 6), 10);
    pack.mode = Some(TrainingMode::OneOnTwo);

    let sessions = vec![
        // bound 1v2 session: 150 + 20
        session(1, 1, 1, date(2025, 3, 3), Some(1)),
        // 2v2 drop-in prices like 1v1
        session(2, 2, 1, date(2025, 3, 4), None),
    ];

    let report = build_weekly_report(
        &trainer,
        &[pair_client, shared],
        &[pack],
        &sessions,
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    let amounts: Vec<f64> = report
        .rows
        .iter()
        .filter(|row| row.kind == BreakdownKind::Class)
        .map(|row| row.amount)
        .collect();
    assert!(close(amounts[0], 170.0));
    assert!(close(amounts[1], 150.0));
}

#[test]
fn client_price_overrides_beat_the_tier_table() {
    let trainer = trainer(1, 1);
    let mut vip = client(1, "Vip", 1);
    vip.price_1_12 = Some(100.0);
    vip.price_13_20 = Some(90.0);
    vip.price_21_plus = Some(80.0);
    vip.mode_premium = Some(10.0);

    let mut pack = package(1, 1, 1, date(2025, 1, 6), 15);
    pack.mode = Some(TrainingMode::OneOnTwo);

    let report = build_weekly_report(
        &trainer,
        &[vip],
        &[pack],
        &[session(1, 1, 1, date(2025, 3, 3), Some(1))],
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    // client's own 13-20 bracket plus the client's own premium
    assert!(close(report.rows[0].amount, 100.0));
}

#[test]
fn thirteenth_class_moves_the_week_to_the_higher_rate() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);
    let sessions: Vec<Session> = (0..13)
        .map(|i| session(i + 1, 1, 1, date(2025, 3, 3), None))
        .collect();

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[],
        &sessions,
        &[],
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    assert_eq!(report.summary.total_classes, 13);
    assert_eq!(report.summary.rate, 0.51);
    assert_eq!(report.active_tier.as_ref().map(|t| t.min_classes), Some(13));
    assert!(close(report.summary.class_income, 13.0 * 150.0 * 0.51));
}

#[test]
fn empty_rate_schedule_zeroes_class_income_but_not_fees() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[],
        &[session(1, 1, 1, date(2025, 3, 3), None)],
        &[late_fee(1, 1, 1, date(2025, 3, 4), 30.0)],
        &[],
        &pricing(),
        week(),
    );

    assert_eq!(report.summary.rate, 0.0);
    assert!(close(report.summary.class_income, 0.0));
    assert!(close(report.summary.final_weekly_income, 30.0));
    assert!(report.active_tier.is_none());
}

#[test]
fn rows_outside_the_week_are_ignored() {
    let trainer = trainer(1, 1);
    let dana = client(1, "Dana", 1);
    let pack = package(1, 1, 1, date(2025, 2, 3), 10);

    let sessions = vec![
        session(1, 1, 1, date(2025, 3, 3), Some(1)),
        // previous week, even though it's the same package
        session(2, 1, 1, date(2025, 2, 24), Some(1)),
    ];
    let fees = vec![late_fee(1, 1, 1, date(2025, 3, 10), 25.0)];

    let report = build_weekly_report(
        &trainer,
        &[dana],
        &[pack],
        &sessions,
        &fees,
        &rate_tiers(1),
        &pricing(),
        week(),
    );

    assert_eq!(report.summary.total_classes, 1);
    assert!(close(report.summary.late_fee_income, 0.0));
    assert_eq!(report.rows.len(), 1);
}
