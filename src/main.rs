//! CohortForge: per-region customer cohorts from a tab-separated customer file
//!
//! Loads every record up front, then either lists the roster or runs the
//! cohort reports and prints them to stdout.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use cohortforge::{load_customers, run_report, Args, Pool, Roster};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    // Any malformed record aborts here, before anything is printed
    let customers = load_customers(&args.input)?;

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if args.list {
        write!(out, "{}", Roster::new(&customers))?;
    } else {
        let plan = args.report_plan();
        let mut pool = Pool::new(customers);
        let reports = run_report(&plan, &mut pool);

        for report in &reports {
            write!(out, "{report}")?;
        }
        tracing::info!(
            regions = reports.len(),
            unassigned = pool.len(),
            "reports complete"
        );
    }

    out.flush()?;
    Ok(())
}

/// Diagnostics go to stderr; `RUST_LOG` takes precedence over `--verbose`
fn init_logging(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
