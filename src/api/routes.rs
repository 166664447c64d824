use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::health::health_check;
use super::{clients, income, late_fees, packages, pricing, sessions, trainers};
use crate::services::{
    ClientService, ClientSummaryService, IncomeRateService, LateFeeService, PackageService,
    PricingService, SessionService, TrainerService, WeeklyIncomeService,
};

/// Shared handler state. Every service is cheap to clone (a pool handle plus,
/// for pricing, the shared table snapshot), so one instance serves all routes.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub trainer_service: TrainerService,
    pub client_service: ClientService,
    pub package_service: PackageService,
    pub session_service: SessionService,
    pub late_fee_service: LateFeeService,
    pub pricing_service: PricingService,
    pub income_rate_service: IncomeRateService,
    pub weekly_income_service: WeeklyIncomeService,
    pub client_summary_service: ClientSummaryService,
}

impl AppState {
    /// The pricing service is injected rather than built here so the caller
    /// controls when its snapshot is first loaded.
    pub fn new(db: PgPool, pricing_service: PricingService) -> Self {
        Self {
            trainer_service: TrainerService::new(db.clone()),
            client_service: ClientService::new(db.clone()),
            package_service: PackageService::new(db.clone()),
            session_service: SessionService::new(db.clone()),
            late_fee_service: LateFeeService::new(db.clone()),
            income_rate_service: IncomeRateService::new(db.clone()),
            weekly_income_service: WeeklyIncomeService::new(db.clone(), pricing_service.clone()),
            client_summary_service: ClientSummaryService::new(db.clone()),
            pricing_service,
            db,
        }
    }
}

pub fn create_routes(db: PgPool, pricing_service: PricingService) -> Router {
    let state = AppState::new(db, pricing_service);

    let api = Router::new()
        .nest("/trainers", trainers::trainer_routes())
        .nest("/clients", clients::client_routes())
        .nest("/packages", packages::package_routes())
        .nest("/sessions", sessions::session_routes())
        .nest("/late-fees", late_fees::late_fee_routes())
        .nest("/income", income::income_routes())
        .nest("/pricing", pricing::pricing_routes());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
