use std::collections::BTreeMap;

use crate::cli::commands::usage_error;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{detail, section};
use crate::cli::registry::CommandEntry;
use crate::core::indicators::FinancialIndicators;
use crate::core::series::ChartView;
use crate::currency::MoneyFormatter;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "summary",
            "Show net worth, averages, allocations and sustainability",
            "summary",
            cmd_summary,
        ),
        CommandEntry::new(
            "series",
            "Show cumulative net worth after each budget entry",
            "series [view]",
            cmd_series,
        ),
        CommandEntry::new(
            "ticks",
            "Show the 24 axis labels for a chart view",
            "ticks [biweekly|monthly|bimonthly|quarterly|semi-annually|annually]",
            cmd_ticks,
        ),
        CommandEntry::new(
            "breakdown",
            "Show income and spending per category",
            "breakdown",
            cmd_breakdown,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let indicators = context.session.indicators();
    print_indicators(&indicators, &money);
    Ok(())
}

pub(crate) fn print_indicators(indicators: &FinancialIndicators, money: &MoneyFormatter) {
    section("Summary");
    let rows = [
        ("Total net worth", money.amount(indicators.total_net_worth)),
        ("Fixed capital", money.amount(indicators.fixed_capital)),
        ("Total income", money.amount(indicators.total_income)),
        ("Total inflows", money.amount(indicators.total_inflows)),
        ("Total expenses", money.amount(indicators.total_expenses)),
        ("  Needs", money.amount(indicators.total_needs)),
        ("  Wants", money.amount(indicators.total_wants)),
        ("Biweekly periods", indicators.num_biweekly_periods.to_string()),
        ("Avg biweekly income", money.optional(indicators.avg_biweekly_income)),
        ("Avg needs / period", money.amount(indicators.avg_needs_spending)),
        ("Avg wants / period", money.amount(indicators.avg_wants_spending)),
        ("Disposable income", money.optional(indicators.disposable_income)),
        ("Needs status", indicators.needs_status.to_string()),
        ("Wants status", indicators.wants_status.to_string()),
    ];
    for (label, value) in rows {
        detail(format!("  {:<22} {}", label, value));
    }

    section("Allocations");
    match &indicators.allocations {
        Some(buckets) => {
            for (label, value) in [
                ("First home", buckets.first_home),
                ("Retirement", buckets.retirement),
                ("Emergency", buckets.emergency),
                ("Tax free", buckets.tax_free),
            ] {
                detail(format!("  {:<22} {}", label, money.amount(value)));
            }
        }
        None => io::print_info("Add an income entry to see allocations."),
    }
}

fn cmd_series(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let money = context.money();
    let series = context.session.time_series();
    section("Net worth series");
    for point in series.points() {
        detail(format!("  {:<32} {:>14}", point.label.to_string(), money.amount(point.value)));
    }
    if let Some(latest) = series.last_value().filter(|_| series.len() > 1) {
        detail(format!("  {:<32} {:>14}", "Latest", money.amount(latest)));
    }
    if let Some(view) = args.first() {
        print_ticks(context, Some(ChartView::parse_lenient(view)));
    }
    Ok(())
}

fn cmd_ticks(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return Err(usage_error("ticks [view]"));
    }
    print_ticks(context, args.first().map(|view| ChartView::parse_lenient(view)));
    Ok(())
}

fn print_ticks(context: &ShellContext, view: Option<ChartView>) {
    let resolved = view.unwrap_or(context.session.config().default_view);
    let labels = context.session.tick_labels(Some(resolved));
    section(format!("Axis labels ({})", resolved));
    detail(format!("  {}", labels.join(" ")));
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let breakdown = context.session.breakdown();
    if breakdown.is_placeholder() {
        section("Category breakdown");
        io::print_info("No data yet.");
        return Ok(());
    }
    print_categories(
        "Income by category",
        breakdown.total_income,
        &breakdown.income_categories,
        &money,
    );
    print_categories(
        "Spending by category",
        breakdown.total_expenses,
        &breakdown.expense_categories,
        &money,
    );
    Ok(())
}

fn print_categories(
    title: &str,
    total: f64,
    categories: &BTreeMap<String, f64>,
    money: &MoneyFormatter,
) {
    section(format!("{} ({})", title, money.amount(total)));
    for (category, amount) in categories {
        detail(format!(
            "  {:<22} {:>14} {:>6.1}%",
            category,
            money.amount(*amount),
            share(*amount, total)
        ));
    }
}

fn share(amount: f64, total: f64) -> f64 {
    if total > 0.0 {
        amount / total * 100.0
    } else {
        0.0
    }
}
