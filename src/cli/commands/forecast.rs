use chrono::NaiveDate;

use crate::cli::commands::{usage_error, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{detail, section};
use crate::cli::registry::CommandEntry;
use crate::core::forecast::IncomeForecastRequest;
use crate::core::period::next_anchor_on_or_after;
use crate::domain::entry::DATE_FORMAT;

const FORECAST_USAGE: &str = "forecast show
forecast income [YYYY-MM-DD] [--amount N | --average] [--needs] [--wants]
forecast expenses
forecast reset";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "forecast",
            "Project net worth forward in biweekly periods",
            FORECAST_USAGE,
            cmd_forecast,
        ),
        CommandEntry::new(
            "chart",
            "Show recorded and projected net worth on one timeline",
            "chart",
            cmd_chart,
        ),
    ]
}

fn cmd_forecast(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = match args.split_first() {
        Some((action, rest)) => (action.to_lowercase(), rest),
        None => ("show".to_string(), args),
    };
    match action.as_str() {
        "show" => show(context),
        "income" => income(context, rest),
        "expenses" | "expense" => expenses(context),
        "reset" => reset(context),
        _ => Err(usage_error(FORECAST_USAGE)),
    }
}

fn show(context: &mut ShellContext) -> CommandResult {
    let money = context.money();
    let summary = context.session.forecast_summary();
    section("Forecast");
    let heading = if summary.is_projected {
        "Forecast net worth"
    } else {
        "Net worth (not yet projected)"
    };
    let end = summary
        .end_date
        .map_or_else(|| "-".to_string(), |date| money.date(date));
    let rows = [
        (heading, money.amount(summary.net_worth)),
        ("Avg biweekly income", money.optional(summary.avg_biweekly_income)),
        ("Total needs", money.amount(summary.total_needs)),
        ("Total wants", money.amount(summary.total_wants)),
        ("Start", money.date(summary.start_date)),
        ("End", end),
        (
            "Periods",
            summary.periods.map_or_else(|| "-".to_string(), |p| p.to_string()),
        ),
        (
            "Status",
            summary
                .status
                .map_or_else(|| "insufficient data".to_string(), |s| s.forecast_label().to_string()),
        ),
    ];
    for (label, value) in rows {
        detail(format!("  {:<30} {}", label, value));
    }
    Ok(())
}

fn income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "forecast income [YYYY-MM-DD] [--amount N | --average] [--needs] [--wants]";
    let parsed = ParsedArgs::parse(args, &["amount"], &["average", "needs", "wants"])?;
    let target = match parsed.positional.as_slice() {
        [] => next_anchor_on_or_after(context.session.today(), context.session.settings().anchor_weekday),
        [raw_date] => NaiveDate::parse_from_str(raw_date, DATE_FORMAT).map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw_date}` is not a YYYY-MM-DD date"))
        })?,
        _ => return Err(usage_error(usage)),
    };

    let mut request = IncomeForecastRequest::new(target);
    match (parsed.option("amount"), parsed.flag("average")) {
        (Some(_), true) => {
            return Err(CommandError::InvalidArguments(
                "use either `--amount` or `--average`, not both".into(),
            ))
        }
        (Some(raw), false) => {
            let amount: f64 = raw.parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not a number"))
            })?;
            request = request.with_amount(amount);
        }
        (None, true) => request = request.using_average(),
        (None, false) => {}
    }
    if parsed.flag("needs") {
        request = request.subtracting_needs();
    }
    if parsed.flag("wants") {
        request = request.subtracting_wants();
    }

    let money = context.money();
    let outcome = context.session.apply_income_forecast(&request)?;
    section("Income forecast");
    detail(format!(
        "  {} -> {} ({} period(s))",
        money.date(outcome.anchor),
        money.date(outcome.target_date),
        outcome.periods
    ));
    detail(format!("  {:<24} {}", "Biweekly income", money.amount(outcome.biweekly_income)));
    detail(format!("  {:<24} {}", "Total contribution", money.amount(outcome.contribution)));
    detail(format!("  {:<24} {}", "Forecast net worth", money.amount(outcome.running_total)));
    detail(format!("  {:<24} {}", "Status", outcome.status.forecast_label()));
    Ok(())
}

fn expenses(context: &mut ShellContext) -> CommandResult {
    let money = context.money();
    let outcome = context.session.apply_expense_forecast();
    section("Expense forecast");
    detail(format!("  {:<24} {}", "Needs", money.amount(outcome.total_needs)));
    detail(format!("  {:<24} {}", "Wants", money.amount(outcome.total_wants)));
    detail(format!("  {:<24} {}", "Total expenses", money.amount(outcome.total_expenses)));
    detail(format!("  {:<24} {}", "Forecast net worth", money.amount(outcome.running_total)));
    let status = outcome
        .status
        .map_or_else(|| "insufficient data".to_string(), |s| s.forecast_label().to_string());
    detail(format!("  {:<24} {}", "Status", status));
    Ok(())
}

fn reset(context: &mut ShellContext) -> CommandResult {
    if !context.confirm("Discard the current forecast?")? {
        io::print_info("Forecast kept.");
        return Ok(());
    }
    context.session.reset_forecast();
    io::print_success("Forecast reset to current net worth.");
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let money = context.money();
    let merged = context.session.chart();
    section("Net worth timeline");
    if merged.is_empty() {
        io::print_info("Nothing to chart yet.");
        return Ok(());
    }
    for (date, value) in merged.iter() {
        detail(format!("  {}  {:>14}", money.date(date), money.optional(value)));
    }
    Ok(())
}
