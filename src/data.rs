//! Customer records and the tab-separated loader

use std::fmt;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

/// Minimum number of positional fields in a customer line
pub const REQUIRED_FIELDS: usize = 10;

/// Market area a customer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Northtown,
    Westville,
    Downtown,
    Docks,
    Suburbia,
    Uptown,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Northtown,
        Region::Westville,
        Region::Downtown,
        Region::Docks,
        Region::Suburbia,
        Region::Uptown,
    ];

    /// Canonical upper-case key, as written in the data file
    pub fn key(self) -> &'static str {
        match self {
            Region::Northtown => "NORTHTOWN",
            Region::Westville => "WESTVILLE",
            Region::Downtown => "DOWNTOWN",
            Region::Docks => "DOCKS",
            Region::Suburbia => "SUBURBIA",
            Region::Uptown => "UPTOWN",
        }
    }

    /// Case-insensitive lookup by key
    pub fn find(key: &str) -> Option<Region> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Service-quality classification, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceTier {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl ServiceTier {
    pub const ALL: [ServiceTier; 5] = [
        ServiceTier::VeryLow,
        ServiceTier::Low,
        ServiceTier::Moderate,
        ServiceTier::High,
        ServiceTier::VeryHigh,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ServiceTier::VeryLow => "VERY_LOW",
            ServiceTier::Low => "LOW",
            ServiceTier::Moderate => "MODERATE",
            ServiceTier::High => "HIGH",
            ServiceTier::VeryHigh => "VERY_HIGH",
        }
    }

    /// Case-insensitive lookup; spaces in `key` are read as underscores
    /// so "Very High" resolves to `VeryHigh`.
    pub fn find(key: &str) -> Option<ServiceTier> {
        let normalized = key.trim().replace(' ', "_");
        Self::ALL
            .into_iter()
            .find(|tier| tier.key().eq_ignore_ascii_case(&normalized))
    }
}

impl fmt::Display for ServiceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Inclusive weekly bounds. `min <= max` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    pub fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    /// Midpoint of the two bounds
    pub fn mean(&self) -> f64 {
        (self.min as f64 + self.max as f64) / 2.0
    }

    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// Reasons a single line cannot be turned into a [`Customer`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("expected at least {} tab-separated fields, found {found}", REQUIRED_FIELDS)]
    MissingFields { found: usize },

    #[error("invalid number in field `{field}`: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("unknown region: {0:?}")]
    UnknownRegion(String),

    #[error("unknown service tier: {0:?}")]
    UnknownTier(String),
}

/// Stable handle for a parsed record: its zero-based position in load order.
///
/// Two customers with identical fields still carry different ids, which is
/// what pool removal keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerId(pub usize);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single customer as read from the data file
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub region: Region,
    pub tier: ServiceTier,
    pub weed_affinity: f64,
    pub meth_affinity: f64,
    pub coca_affinity: f64,
    /// Weekly spend, in currency units
    pub weekly_budget: Range,
    pub weekly_orders: Range,
    /// Trailing fields, re-joined with tabs and kept unparsed
    pub extra: String,
}

impl Customer {
    /// Parse one tab-separated line.
    ///
    /// Field order: name, region, tier, weed, meth, coca, budget-min,
    /// budget-max, orders-min, orders-max, then any trailing fields.
    /// Budget fields carry a one-character currency prefix (`$120`).
    pub fn parse(line: &str) -> Result<Customer, ParseError> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(ParseError::MissingFields {
                found: fields.len(),
            });
        }

        let region = Region::find(fields[1])
            .ok_or_else(|| ParseError::UnknownRegion(fields[1].to_string()))?;
        let tier = ServiceTier::find(fields[2])
            .ok_or_else(|| ParseError::UnknownTier(fields[2].to_string()))?;

        Ok(Customer {
            name: fields[0].to_string(),
            region,
            tier,
            weed_affinity: parse_number("weed_affinity", fields[3])?,
            meth_affinity: parse_number("meth_affinity", fields[4])?,
            coca_affinity: parse_number("coca_affinity", fields[5])?,
            weekly_budget: Range::new(
                parse_currency("budget_min", fields[6])?,
                parse_currency("budget_max", fields[7])?,
            ),
            weekly_orders: Range::new(
                parse_number("orders_min", fields[8])?,
                parse_number("orders_max", fields[9])?,
            ),
            extra: fields[REQUIRED_FIELDS..].join("\t"),
        })
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, ParseError> {
    raw.trim().parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Drops the leading currency symbol, whatever its width in bytes
fn parse_currency(field: &'static str, raw: &str) -> Result<i64, ParseError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    if chars.next().is_none() {
        return Err(ParseError::InvalidNumber {
            field,
            value: raw.to_string(),
        });
    }
    parse_number(field, chars.as_str()).map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Parse every line of `text`. The first malformed line, blank ones
/// included, aborts with its 1-based line number.
pub fn parse_customers(text: &str) -> crate::Result<Vec<Customer>> {
    let mut customers = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        let customer =
            Customer::parse(line).with_context(|| format!("line {}", index + 1))?;

        for (label, range) in [
            ("weekly budget", customer.weekly_budget),
            ("weekly orders", customer.weekly_orders),
        ] {
            if !range.is_ordered() {
                tracing::warn!(
                    line = index + 1,
                    customer = %customer.name,
                    min = range.min,
                    max = range.max,
                    "{label} range has min above max"
                );
            }
        }

        customers.push(customer);
    }

    Ok(customers)
}

/// Load the customer file at `file_path`
///
/// # Arguments
/// * `file_path` - Path to a UTF-8 file with one tab-separated record per line
///
/// # Returns
/// * Customers in file order; a record's index is its [`CustomerId`]
pub fn load_customers(file_path: impl AsRef<Path>) -> crate::Result<Vec<Customer>> {
    let path = file_path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read customer file {}", path.display()))?;

    let customers =
        parse_customers(&text).with_context(|| format!("malformed record in {}", path.display()))?;

    tracing::info!(count = customers.len(), path = %path.display(), "loaded customers");
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "Kyle Cooley\tNorthtown\tVery Low\t0.5\t-0.25\t0.1\t$100\t$300\t1\t3";

    #[test]
    fn test_parse_customer() {
        let customer = Customer::parse(SAMPLE).unwrap();

        assert_eq!(customer.name, "Kyle Cooley");
        assert_eq!(customer.region, Region::Northtown);
        assert_eq!(customer.tier, ServiceTier::VeryLow);
        assert_eq!(customer.weed_affinity, 0.5);
        assert_eq!(customer.meth_affinity, -0.25);
        assert_eq!(customer.coca_affinity, 0.1);
        assert_eq!(customer.weekly_budget, Range::new(100, 300));
        assert_eq!(customer.weekly_orders, Range::new(1, 3));
        assert_eq!(customer.extra, "");
    }

    #[test]
    fn test_parse_keeps_trailing_fields() {
        let line = format!("{SAMPLE}\tMon\tTue\tlikes jazz");
        let customer = Customer::parse(&line).unwrap();
        assert_eq!(customer.extra, "Mon\tTue\tlikes jazz");
    }

    #[test]
    fn test_parse_multibyte_currency_prefix() {
        let line = "Jen Heard\tDOCKS\tHIGH\t0\t0\t1\t€250\t€400\t2\t4";
        let customer = Customer::parse(line).unwrap();
        assert_eq!(customer.weekly_budget, Range::new(250, 400));
    }

    #[test]
    fn test_parse_rejects_short_line() {
        let result = Customer::parse("Kyle\tNORTHTOWN\tLOW\t0.5");
        assert_eq!(result, Err(ParseError::MissingFields { found: 4 }));
    }

    #[test]
    fn test_parse_rejects_bad_numbers() {
        let line = SAMPLE.replace("0.5", "lots");
        assert!(matches!(
            Customer::parse(&line),
            Err(ParseError::InvalidNumber { field: "weed_affinity", .. })
        ));

        // a lone currency symbol has no digits left to parse
        let line = SAMPLE.replace("$100", "$");
        assert!(matches!(
            Customer::parse(&line),
            Err(ParseError::InvalidNumber { field: "budget_min", .. })
        ));

        let line = SAMPLE.replace("\t1\t3", "\t1.5\t3");
        assert!(matches!(
            Customer::parse(&line),
            Err(ParseError::InvalidNumber { field: "orders_min", .. })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let line = SAMPLE.replace("Northtown", "Hyland Point");
        assert_eq!(
            Customer::parse(&line),
            Err(ParseError::UnknownRegion("Hyland Point".to_string()))
        );

        let line = SAMPLE.replace("Very Low", "Platinum");
        assert_eq!(
            Customer::parse(&line),
            Err(ParseError::UnknownTier("Platinum".to_string()))
        );
    }

    #[test]
    fn test_lookups() {
        assert_eq!(Region::find("docks"), Some(Region::Docks));
        assert_eq!(Region::find("UpTown"), Some(Region::Uptown));
        assert_eq!(Region::find("Docks Yard"), None);

        assert_eq!(ServiceTier::find("very high"), Some(ServiceTier::VeryHigh));
        assert_eq!(ServiceTier::find("VERY_LOW"), Some(ServiceTier::VeryLow));
        assert_eq!(ServiceTier::find("medium"), None);
        assert!(ServiceTier::VeryLow < ServiceTier::VeryHigh);
    }

    #[test]
    fn test_range_mean_and_order() {
        let range = Range::new(100, 301);
        assert_eq!(range.mean(), 200.5);
        assert!(range.is_ordered());

        // inverted ranges are kept as-is
        let inverted = Range::new(5, 2);
        assert!(!inverted.is_ordered());
        assert_eq!(inverted.mean(), 3.5);
    }

    #[test]
    fn test_parse_customers_rejects_blank_lines() {
        let text = format!("{SAMPLE}\n\t\t\n{SAMPLE}\n");
        let err = parse_customers(&text).unwrap_err();
        assert_eq!(err.to_string(), "line 2");
        assert_eq!(
            err.downcast_ref::<ParseError>(),
            Some(&ParseError::MissingFields { found: 1 })
        );

        // the final newline does not start another record
        let text = format!("{SAMPLE}\r\n{SAMPLE}\n");
        assert_eq!(parse_customers(&text).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_negative_bounds() {
        let line = "Kyle\tNorthtown\tLow\t0.5\t0\t0\t$-100\t$300\t-1\t3";
        let customer = Customer::parse(line).unwrap();
        assert_eq!(customer.weekly_budget, Range::new(-100, 300));
        assert_eq!(customer.weekly_orders, Range::new(-1, 3));
        assert_eq!(customer.weekly_budget.mean(), 100.0);
    }

    #[test]
    fn test_parse_customers_reports_line_number() {
        let text = format!("{SAMPLE}\n{SAMPLE}\nbroken line\n");
        let err = parse_customers(&text).unwrap_err();
        assert_eq!(err.to_string(), "line 3");
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn test_load_customers() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{SAMPLE}").unwrap();
        writeln!(file, "Meg Cooley\tDOCKS\tMODERATE\t0.1\t0.2\t0.9\t$200\t$500\t2\t5").unwrap();

        let customers = load_customers(file.path()).unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[1].region, Region::Docks);
    }

    #[test]
    fn test_load_customers_missing_file() {
        let result = load_customers("/nonexistent/customers");
        assert!(result.is_err());
    }
}
