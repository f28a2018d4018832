//! CohortForge: regional customer ranking and cohort statistics
//!
//! Loads a tab-separated customer file, ranks customers per region by an
//! affinity-weighted score, takes a fixed-size cohort for each region out of
//! a shared pool and summarises every cohort.

pub mod cli;
pub mod data;
pub mod model;
pub mod report;

// Re-export public items for easier access
pub use cli::Args;
pub use data::{load_customers, Customer, CustomerId, ParseError, Range, Region, ServiceTier};
pub use model::{score, Affinity, CohortStats, Pool, RankedCustomer};
pub use report::{run_report, RegionGroup, RegionReport, ReportPlan, Roster};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
