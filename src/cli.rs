//! Command-line interface definitions and argument parsing

use std::path::PathBuf;

use clap::builder::TypedValueParser;
use clap::Parser;

use crate::report::{ReportPlan, DEFAULT_CAPACITY};

/// Ranks each region's most valuable customers and summarises the cohorts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the tab-separated customer file
    #[arg(short, long, default_value = "./data/customers")]
    pub input: PathBuf,

    /// Number of customers kept per region, also the divisor for averages
    #[arg(
        short = 'k',
        long,
        default_value_t = DEFAULT_CAPACITY,
        value_parser = clap::value_parser!(u16).range(1..).map(usize::from)
    )]
    pub capacity: usize,

    /// Print every loaded customer grouped by region instead of the cohort reports
    #[arg(short, long)]
    pub list: bool,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Report configuration for these arguments
    pub fn report_plan(&self) -> ReportPlan {
        ReportPlan::with_capacity(self.capacity)
    }

    /// Default tracing filter directive
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
