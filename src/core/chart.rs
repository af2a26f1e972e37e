use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entry::DATE_FORMAT;

use super::{forecast::ForecastPoint, series::TnwSeries};

/// Base and projected net worth aligned on one chronological axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedSeries {
    pub dates: Vec<NaiveDate>,
    /// `None` where no source has a value for the date.
    pub values: Vec<Option<f64>>,
}

impl MergedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.dates
            .iter()
            .map(|date| date.format(DATE_FORMAT).to_string())
            .collect()
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        let index = self.dates.binary_search(&date).ok()?;
        self.values.get(index).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, Option<f64>)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }
}

/// Overlays forecast series onto the base series.
///
/// Expense points are written first and income points overwrite them on the
/// same date. Dates without an override fall back to the base series.
pub fn merge_chart(
    base: &TnwSeries,
    expenses: &[ForecastPoint],
    income: &[ForecastPoint],
) -> MergedSeries {
    let mut overrides: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for point in expenses.iter().chain(income) {
        overrides.insert(point.date, point.value);
    }

    let dates: BTreeSet<NaiveDate> = base
        .entry_dates()
        .chain(overrides.keys().copied())
        .collect();

    let (dates, values) = dates
        .into_iter()
        .map(|date| {
            let value = overrides
                .get(&date)
                .copied()
                .or_else(|| base.value_on(date));
            (date, value)
        })
        .unzip();

    MergedSeries { dates, values }
}
