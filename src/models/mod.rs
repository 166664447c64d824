// Domain records and the pure value logic that rides on them

pub mod client;
pub mod income;
pub mod income_rate;
pub mod late_fee;
pub mod package;
pub mod pricing;
pub mod session;
pub mod trainer;
pub mod week;

pub use client::*;
pub use income::*;
pub use income_rate::*;
pub use late_fee::*;
pub use package::*;
pub use pricing::*;
pub use session::*;
pub use trainer::*;
pub use week::*;
