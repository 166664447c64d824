// Business logic services

pub mod allocation;
pub mod client_service;
pub mod client_summary_service;
pub mod income_rate_service;
pub mod late_fee_service;
pub mod package_service;
pub mod pricing_service;
pub mod session_service;
pub mod trainer_service;
pub mod weekly_income_service;

pub use allocation::PackageAllocator;
pub use client_service::ClientService;
pub use client_summary_service::{summarize_client, ClientSummaryService};
pub use income_rate_service::IncomeRateService;
pub use late_fee_service::LateFeeService;
pub use package_service::PackageService;
pub use pricing_service::PricingService;
pub use session_service::SessionService;
pub use trainer_service::TrainerService;
pub use weekly_income_service::{
    build_weekly_report, price_for_session, WeeklyIncomeService, PERSONAL_CLIENT_BONUS,
};
