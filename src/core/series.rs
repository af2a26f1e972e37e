use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::entry::{EntryType, LedgerEntry, DATE_FORMAT};

use super::indicators::EngineSettings;

pub const TICK_COUNT: usize = 24;
const NO_DATA: &str = "No Data";

/// Label attached to one point of the net-worth series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesLabel {
    /// Undated point preceding the first entry.
    Baseline,
    Entry {
        sign: char,
        date: NaiveDate,
        amount: f64,
    },
}

impl SeriesLabel {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            SeriesLabel::Baseline => None,
            SeriesLabel::Entry { date, .. } => Some(*date),
        }
    }
}

impl fmt::Display for SeriesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesLabel::Baseline => f.write_str("0"),
            SeriesLabel::Entry { sign, date, amount } => {
                write!(f, "{}({}, ${:.2})", sign, date.format(DATE_FORMAT), amount)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: SeriesLabel,
    pub value: f64,
}

/// Cumulative net worth after each budget entry, in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct TnwSeries {
    points: Vec<SeriesPoint>,
}

impl TnwSeries {
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|point| point.label.to_string()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.value).collect()
    }

    /// Dates of the entry points, in series order.
    pub fn entry_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().filter_map(|point| point.label.date())
    }

    /// Running total at the end of `date`, if any entry falls on it.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|point| point.label.date() == Some(date))
            .map(|point| point.value)
    }

    /// Value of the last point; the baseline when the ledger is empty.
    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|point| point.value)
    }
}

/// Replays budget entries oldest first, seeding the running total with the fixed capital.
pub fn generate_time_series<'a, I>(entries: I, settings: &EngineSettings) -> TnwSeries
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut sorted: Vec<&LedgerEntry> = entries.into_iter().collect();
    sorted.sort_by_key(|entry| entry.date);

    let mut points = Vec::with_capacity(sorted.len() + 1);
    points.push(SeriesPoint {
        label: SeriesLabel::Baseline,
        value: 0.0,
    });

    let mut running = settings.fixed_capital;
    for entry in sorted {
        if entry.kind.adds_to_net_worth() {
            running += entry.amount;
        } else {
            running -= entry.amount;
        }
        points.push(SeriesPoint {
            label: SeriesLabel::Entry {
                sign: entry.kind.sign(),
                date: entry.date,
                amount: entry.amount,
            },
            value: running,
        });
    }

    TnwSeries { points }
}

/// Horizontal spacing preset for chart axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartView {
    Biweekly,
    Monthly,
    #[default]
    Bimonthly,
    Quarterly,
    SemiAnnually,
    Annually,
}

impl ChartView {
    pub const ALL: [ChartView; 6] = [
        ChartView::Biweekly,
        ChartView::Monthly,
        ChartView::Bimonthly,
        ChartView::Quarterly,
        ChartView::SemiAnnually,
        ChartView::Annually,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartView::Biweekly => "biweekly",
            ChartView::Monthly => "monthly",
            ChartView::Bimonthly => "bimonthly",
            ChartView::Quarterly => "quarterly",
            ChartView::SemiAnnually => "semi-annually",
            ChartView::Annually => "annually",
        }
    }

    /// Wall-clock distance between consecutive ticks.
    pub fn step(&self) -> Duration {
        match self {
            ChartView::Biweekly => Duration::hours(12),
            ChartView::Monthly => Duration::days(1),
            ChartView::Bimonthly => Duration::days(2),
            ChartView::Quarterly => Duration::days(3),
            ChartView::SemiAnnually => Duration::days(7),
            ChartView::Annually => Duration::days(14),
        }
    }

    /// Unknown names fall back to the bimonthly view.
    pub fn parse_lenient(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl FromStr for ChartView {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        ChartView::ALL
            .into_iter()
            .find(|view| view.as_str() == normalized)
            .ok_or_else(|| format!("unknown view `{value}`"))
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decorative `day/month` axis labels starting at the local time `now`.
pub fn generate_tick_labels(view: ChartView, now: NaiveDateTime) -> Vec<String> {
    let step = view.step();
    (0..TICK_COUNT)
        .map(|index| {
            let tick = now + step * index as i32;
            format!("{}/{}", tick.day(), tick.month())
        })
        .collect()
}

/// Income and spending per category, for pie charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub total_income: f64,
    pub total_expenses: f64,
    pub income_categories: BTreeMap<String, f64>,
    pub expense_categories: BTreeMap<String, f64>,
}

impl CategoryBreakdown {
    fn placeholder() -> Self {
        let no_data = BTreeMap::from([(NO_DATA.to_string(), 1.0)]);
        Self {
            total_income: 0.0,
            total_expenses: 0.0,
            income_categories: no_data.clone(),
            expense_categories: no_data,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.total_income == 0.0
            && self.total_expenses == 0.0
            && self.income_categories.contains_key(NO_DATA)
    }
}

/// Splits entries into income and everything else, summed per category.
pub fn category_breakdown<'a, I>(entries: I) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut entries = entries.into_iter().peekable();
    if entries.peek().is_none() {
        return CategoryBreakdown::placeholder();
    }

    let mut breakdown = CategoryBreakdown {
        total_income: 0.0,
        total_expenses: 0.0,
        income_categories: BTreeMap::new(),
        expense_categories: BTreeMap::new(),
    };
    for entry in entries {
        let (total, categories) = if entry.kind == EntryType::Income {
            (&mut breakdown.total_income, &mut breakdown.income_categories)
        } else {
            (&mut breakdown.total_expenses, &mut breakdown.expense_categories)
        };
        *total += entry.amount;
        *categories.entry(entry.category.clone()).or_insert(0.0) += entry.amount;
    }
    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_entries() -> Vec<LedgerEntry> {
        vec![
            LedgerEntry::new(1, EntryType::Needs, 150.0, "Rent", date(2024, 1, 10)),
            LedgerEntry::new(2, EntryType::Income, 1000.0, "Salary", date(2024, 1, 5)),
            LedgerEntry::new(3, EntryType::Inflow, 20.0, "Refund", date(2024, 1, 10)),
        ]
    }

    #[test]
    fn series_starts_with_baseline_and_walks_dates_in_order() {
        let settings = EngineSettings::default();
        let series = generate_time_series(&sample_entries(), &settings);

        assert_eq!(
            series.labels(),
            vec![
                "0".to_string(),
                "+(2024-01-05, $1000.00)".to_string(),
                "-(2024-01-10, $150.00)".to_string(),
                "↑(2024-01-10, $20.00)".to_string(),
            ]
        );
        let values = series.values();
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 3818.66).abs() < 1e-9);
        assert!((values[2] - 3668.66).abs() < 1e-9);
        assert!((values[3] - 3688.66).abs() < 1e-9);
    }

    #[test]
    fn value_on_uses_last_point_of_the_day() {
        let series = generate_time_series(&sample_entries(), &EngineSettings::default());
        let value = series.value_on(date(2024, 1, 10)).unwrap();
        assert!((value - 3688.66).abs() < 1e-9);
        assert_eq!(series.value_on(date(2024, 2, 1)), None);
    }

    #[test]
    fn ticks_are_fixed_length_and_spaced_by_view() {
        let now = date(2024, 1, 30).and_hms_opt(18, 0, 0).unwrap();
        let ticks = generate_tick_labels(ChartView::Monthly, now);
        assert_eq!(ticks.len(), TICK_COUNT);
        assert_eq!(ticks[0], "30/1");
        assert_eq!(ticks[2], "1/2");

        let half_days = generate_tick_labels(ChartView::Biweekly, now);
        assert_eq!(half_days[..3], ["30/1", "31/1", "31/1"]);
    }

    #[test]
    fn unknown_view_falls_back_to_bimonthly() {
        assert_eq!(ChartView::parse_lenient("fortnightly"), ChartView::Bimonthly);
        assert_eq!(ChartView::parse_lenient("Semi-Annually"), ChartView::SemiAnnually);
    }

    #[test]
    fn breakdown_groups_by_category() {
        let breakdown = category_breakdown(&sample_entries());
        assert_eq!(breakdown.total_income, 1000.0);
        assert_eq!(breakdown.total_expenses, 170.0);
        assert_eq!(breakdown.expense_categories.get("Rent"), Some(&150.0));
        assert_eq!(breakdown.expense_categories.get("Refund"), Some(&20.0));
    }

    #[test]
    fn empty_breakdown_uses_placeholder() {
        let breakdown = category_breakdown(Vec::<LedgerEntry>::new().iter());
        assert!(breakdown.is_placeholder());
        assert_eq!(breakdown.income_categories.get("No Data"), Some(&1.0));
    }
}
