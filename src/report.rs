//! Per-region report driver and console formatting

use std::fmt;

use crate::data::{Customer, Region};
use crate::model::{score, Affinity, CohortStats, Pool, RankedCustomer};

/// Cohort size used when none is configured
pub const DEFAULT_CAPACITY: usize = 8;

const TEXT_WIDTH: usize = 20;
const NUMBER_WIDTH: usize = 5;

/// Regions that are ranked by the same affinity, in processing order
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup {
    pub affinity: Affinity,
    pub regions: Vec<Region>,
}

impl RegionGroup {
    pub fn new(affinity: Affinity, regions: impl Into<Vec<Region>>) -> Self {
        Self {
            affinity,
            regions: regions.into(),
        }
    }
}

/// Ordered region groups plus the cohort capacity shared by all of them.
///
/// Group and region order matter: earlier regions pick from the pool first.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPlan {
    pub groups: Vec<RegionGroup>,
    pub capacity: usize,
}

impl Default for ReportPlan {
    fn default() -> Self {
        Self {
            groups: vec![
                RegionGroup::new(
                    Affinity::Weed,
                    [Region::Northtown, Region::Westville, Region::Downtown],
                ),
                RegionGroup::new(Affinity::Coca, [Region::Docks]),
            ],
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ReportPlan {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Every (region, affinity) step in processing order
    pub fn steps(&self) -> impl Iterator<Item = (Region, Affinity)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.regions.iter().map(move |&region| (region, group.affinity)))
    }
}

/// Ranked cohort and statistics for one region
#[derive(Debug, Clone, PartialEq)]
pub struct RegionReport {
    pub region: Region,
    pub affinity: Affinity,
    pub capacity: usize,
    pub cohort: Vec<RankedCustomer>,
    pub stats: CohortStats,
}

impl RegionReport {
    /// Whether the region ran out of customers before filling its cohort
    pub fn is_short(&self) -> bool {
        self.cohort.len() < self.capacity
    }
}

/// Run every step of `plan` against `pool`.
///
/// The pool is threaded through the steps in order; each region's cohort is
/// removed from it before the next region is ranked, so no customer lands in
/// two cohorts.
pub fn run_report(plan: &ReportPlan, pool: &mut Pool) -> Vec<RegionReport> {
    plan.steps()
        .map(|(region, affinity)| {
            let available = pool.count_in(region);
            let cohort = pool.select_cohort(region, plan.capacity, |c| score(c, affinity));
            let stats = CohortStats::calculate(
                cohort.iter().map(|ranked| &ranked.customer),
                plan.capacity,
                affinity,
            );

            tracing::debug!(
                %region,
                %affinity,
                available,
                selected = cohort.len(),
                remaining = pool.len(),
                "cohort selected"
            );

            let report = RegionReport {
                region,
                affinity,
                capacity: plan.capacity,
                cohort,
                stats,
            };

            if report.is_short() {
                tracing::warn!(
                    %region,
                    selected = report.cohort.len(),
                    capacity = report.capacity,
                    "cohort under capacity, averages are divided by capacity"
                );
            }

            report
        })
        .collect()
}

/// Column header row, aligned with [`format_row`]
pub fn table_header() -> String {
    let header = format!(
        "     {:<tw$}   {:<tw$}   {:<tw$}   {:<nw$}   {:<nw$}   {:<nw$}   {:<nw$}   {:<nw$}   {:<nw$}   {:<nw$}",
        "Name",
        "Area",
        "Standard",
        "Weed",
        "Meth",
        "Coca",
        "Min B",
        "Max B",
        "Min O",
        "Max O",
        tw = TEXT_WIDTH,
        nw = NUMBER_WIDTH,
    );
    header.trim_end().to_string()
}

/// One table row with a zero-based rank
pub fn format_row(rank: usize, customer: &Customer) -> String {
    format!(
        "{rank:>2} | {:<tw$} | {:<tw$} | {:<tw$} | {:<nw$} | {:<nw$} | {:<nw$} | {:<nw$} | {:<nw$} | {:<nw$} | {:<nw$} |",
        customer.name,
        customer.region,
        customer.tier,
        format_affinity(customer.weed_affinity),
        format_affinity(customer.meth_affinity),
        format_affinity(customer.coca_affinity),
        customer.weekly_budget.min,
        customer.weekly_budget.max,
        customer.weekly_orders.min,
        customer.weekly_orders.max,
        tw = TEXT_WIDTH,
        nw = NUMBER_WIDTH,
    )
}

/// Always shows a decimal point: `1.0`, `0.55`
fn format_affinity(value: f64) -> String {
    format!("{value:?}")
}

impl fmt::Display for RegionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.region)?;
        writeln!(f, "{}", table_header())?;
        for (rank, ranked) in self.cohort.iter().enumerate() {
            writeln!(f, "{}", format_row(rank, &ranked.customer))?;
        }
        writeln!(f)?;
        writeln!(f, "Average Orders: {:?} / week", self.stats.avg_orders)?;
        writeln!(f, "Average Budget: {:?} $ / week", self.stats.avg_budget)?;
        writeln!(f, "Average Affinity: {:?}", self.stats.avg_affinity)?;
        writeln!(
            f,
            "Sector Valuability: {:?} $ / week²",
            self.stats.sector_valuability
        )?;
        writeln!(f)
    }
}

/// Every loaded customer grouped by region, file order kept within a region
pub struct Roster<'a> {
    customers: Vec<&'a Customer>,
}

impl<'a> Roster<'a> {
    pub fn new(customers: &'a [Customer]) -> Self {
        let mut customers: Vec<&Customer> = customers.iter().collect();
        customers.sort_by_key(|customer| customer.region);
        Self { customers }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

impl fmt::Display for Roster<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", table_header())?;
        for (index, customer) in self.customers.iter().enumerate() {
            writeln!(f, "{}", format_row(index, customer))?;
        }
        Ok(())
    }
}
