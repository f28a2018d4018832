//! Scoring, cohort selection and cohort statistics

use std::collections::BTreeMap;
use std::fmt;

use crate::data::{Customer, CustomerId, Region};

/// Which of the three product affinities a region is ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affinity {
    Weed,
    Meth,
    Coca,
}

impl Affinity {
    /// Read the selected affinity off a customer
    pub fn of(self, customer: &Customer) -> f64 {
        match self {
            Affinity::Weed => customer.weed_affinity,
            Affinity::Meth => customer.meth_affinity,
            Affinity::Coca => customer.coca_affinity,
        }
    }
}

impl fmt::Display for Affinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Affinity::Weed => "weed",
            Affinity::Meth => "meth",
            Affinity::Coca => "coca",
        };
        f.pad(name)
    }
}

/// Desirability of `customer` when ranked by `affinity`:
/// affinity * mean weekly budget * mean weekly orders.
///
/// NaN inputs produce a NaN score.
pub fn score(customer: &Customer, affinity: Affinity) -> f64 {
    affinity.of(customer) * customer.weekly_budget.mean() * customer.weekly_orders.mean()
}

/// A customer taken out of the pool, with the score it was ranked by
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCustomer {
    pub id: CustomerId,
    pub customer: Customer,
    pub score: f64,
}

/// Customers not yet assigned to any cohort, keyed by their load-order id
#[derive(Debug, Clone, Default)]
pub struct Pool {
    remaining: BTreeMap<CustomerId, Customer>,
}

impl Pool {
    /// Build a pool from customers in load order; the index becomes the id
    pub fn new(customers: Vec<Customer>) -> Self {
        let remaining = customers
            .into_iter()
            .enumerate()
            .map(|(index, customer)| (CustomerId(index), customer))
            .collect();
        Self { remaining }
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn contains(&self, id: CustomerId) -> bool {
        self.remaining.contains_key(&id)
    }

    /// Remaining customers in load order
    pub fn iter(&self) -> impl Iterator<Item = (CustomerId, &Customer)> {
        self.remaining.iter().map(|(&id, customer)| (id, customer))
    }

    /// Number of remaining customers in `region`
    pub fn count_in(&self, region: Region) -> usize {
        self.remaining
            .values()
            .filter(|customer| customer.region == region)
            .count()
    }

    /// Take the top `capacity` customers of `region` out of the pool.
    ///
    /// The whole pool is ranked by `scorer`, highest first; ties keep load
    /// order. Members of `region` are taken from the top of that ranking
    /// until `capacity` is reached. Taken customers are removed by id, so a
    /// later call never sees them again.
    ///
    /// Returns the cohort, rank 0 first. It is shorter than `capacity` when
    /// the region runs out of customers.
    pub fn select_cohort<F>(&mut self, region: Region, capacity: usize, scorer: F) -> Vec<RankedCustomer>
    where
        F: Fn(&Customer) -> f64,
    {
        let mut ranking: Vec<(CustomerId, f64)> = self
            .iter()
            .map(|(id, customer)| (id, scorer(customer)))
            .collect();
        // stable, so equal scores stay in load order
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));

        let chosen: Vec<(CustomerId, f64)> = ranking
            .into_iter()
            .filter(|(id, _)| self.remaining[id].region == region)
            .take(capacity)
            .collect();

        chosen
            .into_iter()
            .filter_map(|(id, score)| {
                self.remaining
                    .remove(&id)
                    .map(|customer| RankedCustomer { id, customer, score })
            })
            .collect()
    }
}

/// Summary statistics for one cohort.
///
/// Every average divides by the configured capacity rather than the number
/// of members, so an under-filled cohort reports lower averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortStats {
    /// Mean of each member's mid-range weekly orders
    pub avg_orders: f64,
    /// Mean of each member's mid-range weekly budget
    pub avg_budget: f64,
    /// Mean of the ranking affinity
    pub avg_affinity: f64,
    /// avg_orders * avg_budget * avg_affinity / 1,000,000
    pub sector_valuability: f64,
}

impl CohortStats {
    /// Computes cohort statistics.
    ///
    /// # Arguments
    /// * `members` - Customers in the cohort
    /// * `capacity` - Configured cohort size, used as the divisor
    /// * `affinity` - Affinity the cohort was ranked by
    pub fn calculate<'a, I>(members: I, capacity: usize, affinity: Affinity) -> Self
    where
        I: IntoIterator<Item = &'a Customer>,
    {
        let mut total_orders = 0.0;
        let mut total_budget = 0.0;
        let mut total_affinity = 0.0;

        for customer in members {
            total_orders += customer.weekly_orders.mean();
            total_budget += customer.weekly_budget.mean();
            total_affinity += affinity.of(customer);
        }

        let divisor = capacity as f64;
        let avg_orders = total_orders / divisor;
        let avg_budget = total_budget / divisor;
        let avg_affinity = total_affinity / divisor;

        Self {
            avg_orders,
            avg_budget,
            avg_affinity,
            sector_valuability: sector_valuability(avg_orders, avg_budget, avg_affinity),
        }
    }
}

/// Composite value figure for a cohort, scaled down by one million for display
pub fn sector_valuability(avg_orders: f64, avg_budget: f64, avg_affinity: f64) -> f64 {
    avg_orders * avg_budget * avg_affinity / 1_000_000.0
}
