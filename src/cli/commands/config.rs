use crate::cli::commands::usage_error;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{detail, section};
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show display preferences and engine constants",
        "config show",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None | Some("show") => show(context),
        Some(_) => Err(usage_error("config show")),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    let config = context.session.config();
    let engine = &config.engine;
    let money = config.money();
    let percent = |rate: f64| format!("{:.0}%", rate * 100.0);

    section("Configuration");
    detail(format!("  {:<20} {}", "File", context.config_manager.config_path().display()));
    detail(format!("  {:<20} {}", "Currency", config.currency.as_str()));
    detail(format!("  {:<20} {}", "Locale", config.locale.language_tag));
    detail(format!("  {:<20} {}", "Default view", config.default_view));

    section("Engine");
    let rows = [
        ("Fixed capital", money.amount(engine.fixed_capital)),
        ("First home seed", money.amount(engine.first_home_seed)),
        ("Retirement seed", money.amount(engine.retirement_seed)),
        ("First home rate", percent(engine.first_home_rate)),
        ("Retirement rate", percent(engine.retirement_rate)),
        ("Emergency rate", percent(engine.emergency_rate)),
        ("Tax free rate", percent(engine.tax_free_rate)),
        (
            "Needs tiers",
            format!(
                "{} / {}",
                percent(engine.needs_thresholds.sustainable),
                percent(engine.needs_thresholds.shutdown)
            ),
        ),
        (
            "Wants tiers",
            format!(
                "{} / {}",
                percent(engine.wants_thresholds.sustainable),
                percent(engine.wants_thresholds.shutdown)
            ),
        ),
        ("Period anchor", engine.anchor_weekday.to_string()),
    ];
    for (label, value) in rows {
        detail(format!("  {:<20} {}", label, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell_context::test_support::context;

    #[test]
    fn show_is_the_default_action() {
        let mut context = context();
        cmd_config(&mut context, &[]).unwrap();
        cmd_config(&mut context, &["SHOW"]).unwrap();
        assert!(cmd_config(&mut context, &["set"]).is_err());
    }
}
