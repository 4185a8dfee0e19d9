use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// One of the seven items tracked in the stock register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Commodity {
    Rice,
    Dhal,
    Oil,
    Salt,
    Gram,
    Chickpea,
    /// Counted in whole units rather than weighed
    Egg,
}

impl Commodity {
    /// All commodities in register column order
    pub const ALL: [Commodity; 7] = [
        Commodity::Rice,
        Commodity::Dhal,
        Commodity::Oil,
        Commodity::Salt,
        Commodity::Gram,
        Commodity::Chickpea,
        Commodity::Egg,
    ];

    /// Human-readable name for display and export headers
    pub fn name(&self) -> &'static str {
        match self {
            Commodity::Rice => "Rice",
            Commodity::Dhal => "Dhal",
            Commodity::Oil => "Oil",
            Commodity::Salt => "Salt",
            Commodity::Gram => "Gram",
            Commodity::Chickpea => "Chickpea",
            Commodity::Egg => "Egg",
        }
    }

    /// Machine key, matching the serialized field name in `Stock`
    pub fn key(&self) -> &'static str {
        match self {
            Commodity::Rice => "rice",
            Commodity::Dhal => "dhal",
            Commodity::Oil => "oil",
            Commodity::Salt => "salt",
            Commodity::Gram => "gram",
            Commodity::Chickpea => "chickpea",
            Commodity::Egg => "egg",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Commodity::Egg => "nos",
            _ => "kg",
        }
    }

    pub fn is_count_only(&self) -> bool {
        matches!(self, Commodity::Egg)
    }

    /// Decimal places used when displaying a quantity of this commodity
    pub fn display_precision(&self) -> usize {
        if self.is_count_only() { 0 } else { 3 }
    }

    /// Format a quantity at this commodity's display precision
    pub fn format_quantity(&self, quantity: f64) -> String {
        format!("{:.*}", self.display_precision(), quantity)
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One quantity per commodity.
///
/// Bulk goods are measured in kilograms, eggs in whole units. Running balances
/// are allowed to go negative when consumption outruns supply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub rice: f64,
    pub dhal: f64,
    pub oil: f64,
    pub salt: f64,
    pub gram: f64,
    pub chickpea: f64,
    pub egg: f64,
}

impl Stock {
    /// The zero stock
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a stock by evaluating `f` once per commodity
    pub fn from_fn<F: FnMut(Commodity) -> f64>(mut f: F) -> Self {
        let mut stock = Self::zero();
        for commodity in Commodity::ALL {
            stock.set(commodity, f(commodity));
        }
        stock
    }

    pub fn get(&self, commodity: Commodity) -> f64 {
        match commodity {
            Commodity::Rice => self.rice,
            Commodity::Dhal => self.dhal,
            Commodity::Oil => self.oil,
            Commodity::Salt => self.salt,
            Commodity::Gram => self.gram,
            Commodity::Chickpea => self.chickpea,
            Commodity::Egg => self.egg,
        }
    }

    pub fn set(&mut self, commodity: Commodity, quantity: f64) {
        match commodity {
            Commodity::Rice => self.rice = quantity,
            Commodity::Dhal => self.dhal = quantity,
            Commodity::Oil => self.oil = quantity,
            Commodity::Salt => self.salt = quantity,
            Commodity::Gram => self.gram = quantity,
            Commodity::Chickpea => self.chickpea = quantity,
            Commodity::Egg => self.egg = quantity,
        }
    }

    /// Apply `f` to every quantity
    pub fn map<F: FnMut(Commodity, f64) -> f64>(&self, mut f: F) -> Self {
        Self::from_fn(|c| f(c, self.get(c)))
    }

    pub fn is_zero(&self) -> bool {
        Commodity::ALL.iter().all(|c| self.get(*c) == 0.0)
    }

    /// Commodities whose quantity is below zero
    pub fn negative_commodities(&self) -> Vec<Commodity> {
        Commodity::ALL
            .into_iter()
            .filter(|c| self.get(*c) < 0.0)
            .collect()
    }
}

impl Add for Stock {
    type Output = Stock;

    fn add(self, rhs: Stock) -> Stock {
        Stock::from_fn(|c| self.get(c) + rhs.get(c))
    }
}

impl Sub for Stock {
    type Output = Stock;

    fn sub(self, rhs: Stock) -> Stock {
        Stock::from_fn(|c| self.get(c) - rhs.get(c))
    }
}

impl AddAssign for Stock {
    fn add_assign(&mut self, rhs: Stock) {
        *self = *self + rhs;
    }
}

/// Stock received on a day, split by the school level it was allotted to
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StockReceived {
    pub primary: Stock,
    pub upper_primary: Stock,
}

impl StockReceived {
    /// Combined receipts across both levels
    pub fn total(&self) -> Stock {
        self.primary + self.upper_primary
    }
}

/// Raw inputs for one calendar day, as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyInput {
    pub date: NaiveDate,
    pub primary_students: i64,
    pub upper_primary_students: i64,
    pub stock_received: StockReceived,
    pub eggs_issued: bool,
    pub dhal_issued: bool,
    pub chickpeas_issued: bool,
    pub gram_issued: bool,
}

impl DailyInput {
    /// A day with no students, no receipts and nothing issued
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            primary_students: 0,
            upper_primary_students: 0,
            stock_received: StockReceived::default(),
            eggs_issued: false,
            dhal_issued: false,
            chickpeas_issued: false,
            gram_issued: false,
        }
    }

    /// Combined headcount, widened so any pair of `i64` headcounts fits
    pub fn total_students(&self) -> i128 {
        i128::from(self.primary_students) + i128::from(self.upper_primary_students)
    }

    /// Whether a commodity is handed out today.
    ///
    /// Rice, oil and salt go out every serving day; the rest follow their flag.
    pub fn is_issued(&self, commodity: Commodity) -> bool {
        match commodity {
            Commodity::Egg => self.eggs_issued,
            Commodity::Dhal => self.dhal_issued,
            Commodity::Chickpea => self.chickpeas_issued,
            Commodity::Gram => self.gram_issued,
            Commodity::Rice | Commodity::Oil | Commodity::Salt => true,
        }
    }
}

/// A fully computed register row for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    /// 0 = Sunday, 1 = Monday, ..., 6 = Saturday
    pub day_of_week: u32,
    pub primary_students: i64,
    pub upper_primary_students: i64,
    pub opening_balance: Stock,
    pub stock_received: StockReceived,
    pub consumption: Stock,
    pub closing_balance: Stock,
    pub is_holiday: bool,
    pub eggs_issued: bool,
    pub dhal_issued: bool,
    pub chickpeas_issued: bool,
    pub gram_issued: bool,
}

impl DailyRecord {
    /// The raw inputs this record was computed from
    pub fn to_input(&self) -> DailyInput {
        DailyInput {
            date: self.date,
            primary_students: self.primary_students,
            upper_primary_students: self.upper_primary_students,
            stock_received: self.stock_received,
            eggs_issued: self.eggs_issued,
            dhal_issued: self.dhal_issued,
            chickpeas_issued: self.chickpeas_issued,
            gram_issued: self.gram_issued,
        }
    }
}

impl From<&DailyRecord> for DailyInput {
    fn from(record: &DailyRecord) -> Self {
        record.to_input()
    }
}

/// Identifies one month of the register (month is 1-12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month a date falls in
    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// Key under which this month is persisted
    pub fn storage_key(&self) -> String {
        format!("stock-register-{}-{:02}", self.year, self.month)
    }

    /// Parse a key produced by `storage_key`
    pub fn from_storage_key(key: &str) -> Option<Self> {
        let rest = key.strip_prefix("stock-register-")?;
        let (year, month) = rest.rsplit_once('-')?;
        let key = Self::new(year.parse().ok()?, month.parse().ok()?);
        key.is_valid().then_some(key)
    }

    pub fn previous(&self) -> Self {
        if self.month <= 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        *self == Self::of(date)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Persisted state of one month: the computed rows and the month's opening balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRegister {
    pub day_records: Vec<DailyRecord>,
    pub opening_balance: Stock,
}

impl MonthRegister {
    /// Raw inputs of every day, in date order
    pub fn inputs(&self) -> Vec<DailyInput> {
        self.day_records.iter().map(DailyInput::from).collect()
    }

    /// Closing balance of the last day, if the month has any rows
    pub fn final_closing_balance(&self) -> Option<Stock> {
        self.day_records.last().map(|r| r.closing_balance)
    }

    pub fn record_for(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.day_records.iter().find(|r| r.date == date)
    }
}

/// Month totals per commodity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub opening_balance: Stock,
    pub total_received: Stock,
    pub total_consumption: Stock,
    pub closing_balance: Stock,
}

/// Summary of one stored month within a yearly report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyMonthEntry {
    pub month: MonthKey,
    pub summary: MonthlySummary,
}

/// Yearly report across every stored month of a year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub year: i32,
    pub months: Vec<YearlyMonthEntry>,
    pub totals: MonthlySummary,
}

/// CSV export produced for download or printing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataResponse {
    pub csv_content: String,
    pub filename: String,
    pub row_count: usize,
}
