use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output::{detail, section};
use crate::cli::registry::CommandEntry;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    section(format!("Fintel {}", meta.version));
    detail(format!("  Build hash   : {}", meta.git_hash));
    detail(format!("  Built at     : {}", meta.timestamp));
    detail(format!("  Target       : {}", meta.target));
    detail(format!("  Profile      : {}", meta.profile));
    detail(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell_context::test_support::context;

    #[test]
    fn help_handles_known_and_unknown_commands() {
        let mut context = context();
        cmd_help(&mut context, &[]).unwrap();
        cmd_help(&mut context, &["Forecast"]).unwrap();
        cmd_help(&mut context, &["forcast"]).unwrap();
    }

    #[test]
    fn exit_requests_shutdown() {
        let mut context = context();
        assert!(matches!(cmd_exit(&mut context, &[]), Err(CommandError::ExitRequested)));
        cmd_version(&mut context, &[]).unwrap();
    }
}
