mod common;

use common::{assert_close, date, reference_session};
use fintel_core::{
    core::{
        forecast::{ForecastState, IncomeForecastRequest},
        indicators::SustainabilityStatus,
        period::count_biweekly_periods,
    },
    domain::entry::EntryDraft,
    ledger::CollectionKind,
};

#[test]
fn reference_ledger_indicators() {
    let session = reference_session();
    let indicators = session.indicators();

    assert_eq!(indicators.avg_biweekly_income, Some(1000.0));
    assert_close(indicators.total_net_worth, 3668.66);
    assert_eq!(indicators.needs_status, SustainabilityStatus::Sustainable);
    assert_eq!(indicators.wants_status, SustainabilityStatus::Sustainable);
    assert_eq!(
        session.config().money().amount(indicators.total_net_worth),
        "$3668.66"
    );
}

#[test]
fn net_worth_identity_holds_across_entry_types() {
    let mut session = reference_session();
    for draft in [
        EntryDraft::new("Inflow", "250.25", "Refund", "2024-01-11"),
        EntryDraft::new("Wants", "40.10", "Movies", "2024-01-11"),
        EntryDraft::new("Income", "999.99", "Salary", "2024-01-19"),
    ] {
        session.add_entry(CollectionKind::Budget, &draft).unwrap();
    }
    let ind = session.indicators();
    let expected = ind.fixed_capital + ind.total_income + ind.total_inflows
        - ind.total_needs
        - ind.total_wants;
    assert_eq!(ind.total_net_worth, expected);
    assert_close(ind.total_income, 1999.99);
    assert_eq!(ind.counts.income, 2);
}

#[test]
fn period_count_never_drops_below_one() {
    let anchor = date(2024, 1, 12);
    assert_eq!(count_biweekly_periods(anchor, date(2023, 6, 1)), 1);
    assert_eq!(count_biweekly_periods(anchor, anchor), 1);
    assert_eq!(count_biweekly_periods(anchor, date(2024, 2, 9)), 2);
}

#[test]
fn income_forecasts_accumulate_until_reset() {
    let mut session = reference_session();
    let request = IncomeForecastRequest::new(date(2024, 2, 9)).with_amount(500.0);

    let first = session.apply_income_forecast(&request).unwrap();
    assert_eq!(first.periods, 2);
    assert_close(first.running_total, 4668.66);

    let second = session.apply_income_forecast(&request).unwrap();
    assert_close(second.running_total, 5668.66);

    session.reset_forecast();
    assert_eq!(session.forecast_state(), ForecastState::Unseeded);
    assert_close(session.forecast_total(), 3668.66);
}

#[test]
fn forecast_reads_ignore_ledger_changes_until_reset() {
    let mut session = reference_session();
    assert_close(session.forecast_total(), 3668.66);
    session
        .add_entry(
            CollectionKind::Budget,
            &EntryDraft::new("Inflow", "100", "Gift", "2024-01-11"),
        )
        .unwrap();
    assert_close(session.forecast_total(), 3668.66);
    assert_close(session.indicators().total_net_worth, 3768.66);
    assert!(session.forecast_summary().is_projected);
}

#[test]
fn merged_chart_prefers_income_projection() {
    let mut session = reference_session();
    session
        .add_entry(
            CollectionKind::Expense,
            &EntryDraft::new("Wants", "50", "Dinner", "2024-01-12"),
        )
        .unwrap();

    let income = session
        .apply_income_forecast(&IncomeForecastRequest::new(date(2024, 2, 9)).with_amount(500.0))
        .unwrap();
    assert_eq!(income.series.first().map(|p| p.date), Some(date(2024, 1, 12)));
    let expenses = session.apply_expense_forecast();
    assert_close(expenses.running_total, 4618.66);

    let chart = session.chart();
    assert_close(chart.value_on(date(2024, 1, 12)).unwrap(), 3668.66);
    assert_close(chart.value_on(date(2024, 1, 10)).unwrap(), 3668.66);
    assert_close(chart.value_on(date(2024, 2, 9)).unwrap(), 4668.66);
    assert!(chart.dates.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn average_income_is_unavailable_without_income_entries() {
    let base = common::temp_base();
    let mut session = common::open_session(&base, date(2024, 1, 12));
    session
        .add_entry(
            CollectionKind::Budget,
            &EntryDraft::new("Needs", "10", "Snacks", "2024-01-05"),
        )
        .unwrap();
    assert_eq!(session.indicators().avg_biweekly_income, None);
    assert!(session
        .apply_income_forecast(&IncomeForecastRequest::new(date(2024, 2, 9)).using_average())
        .is_err());
    assert_eq!(session.forecast_state(), ForecastState::Unseeded);
}
