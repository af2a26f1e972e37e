use std::io::{self, BufRead};

use rustyline::{
    completion::Completer, error::ReadlineError, highlight::Highlighter, hint::Hinter,
    history::DefaultHistory, validate::Validator, Cmd, Context, Editor, Helper, KeyEvent,
};

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use crate::cli::output::info as output_info;

/// Setting this variable switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "FINTEL_CLI_SCRIPT";

type LineEditor = Editor<CommandNames, DefaultHistory>;

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    announce_repairs(&context);

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn announce_repairs(context: &ShellContext) {
    let repaired = context
        .session
        .load_reports()
        .iter()
        .filter(|report| report.dropped > 0 || report.reset);
    for report in repaired {
        let suffix = if report.reset { ", store reset" } else { "" };
        context.print_warning(&format!(
            "{} data repaired on load: {} row(s) dropped{suffix}",
            report.kind, report.dropped
        ));
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    output_info("Fintel shell. Type `help` for commands.");
    let mut editor = line_editor(context)?;

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();
                if execute(context, line)? == LoopControl::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) if context.confirm_exit()? => break,
            Err(ReadlineError::Interrupted) => {}
            Err(ReadlineError::Eof) => {
                output_info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    for line in io::stdin().lock().lines() {
        if !context.running || execute(context, &line?)? == LoopControl::Exit {
            break;
        }
    }
    Ok(())
}

fn line_editor(context: &ShellContext) -> Result<LineEditor, CliError> {
    let mut editor = LineEditor::new()?;
    editor.set_helper(Some(CommandNames::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    Ok(editor)
}

/// Runs one line, reporting command failures without ending the session.
fn execute(context: &mut ShellContext, line: &str) -> Result<LoopControl, CliError> {
    match handle_line(context, line) {
        Ok(control) => Ok(control),
        Err(err) => {
            context.report_error(err)?;
            Ok(LoopControl::Continue)
        }
    }
}

pub(crate) fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not read command: {err}"));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let control = context.dispatch(&raw.to_lowercase(), raw, &args)?;
    if control == LoopControl::Exit {
        context.running = false;
    }
    Ok(control)
}

/// Tab completion over command names; arguments are not completed.
struct CommandNames {
    names: Vec<String>,
}

impl CommandNames {
    fn new(names: Vec<&'static str>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    fn matching(&self, word: &str) -> Vec<String> {
        let word = word.to_ascii_lowercase();
        self.names
            .iter()
            .filter(|name| name.starts_with(&word))
            .cloned()
            .collect()
    }
}

impl Completer for CommandNames {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let typed = &line[..pos];
        let word = typed.trim_start();
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((typed.len() - word.len(), self.matching(word)))
    }
}

impl Hinter for CommandNames {
    type Hint = String;
}

impl Highlighter for CommandNames {}

impl Validator for CommandNames {}

impl Helper for CommandNames {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell_context::test_support::context;
    use crate::ledger::CollectionKind;

    #[test]
    fn quoted_arguments_stay_together() {
        let mut context = context();
        handle_line(&mut context, r#"expense add Wants 25 "Board games" 2024-01-06"#).unwrap();
        let expenses = context.session.collection(CollectionKind::Expense);
        assert_eq!(expenses.get(1).map(|e| e.category.as_str()), Some("Board games"));
    }

    #[test]
    fn unterminated_quotes_are_ignored() {
        let mut context = context();
        let control = handle_line(&mut context, "budget add \"unterminated").unwrap();
        assert_eq!(control, LoopControl::Continue);
        assert!(context.last_command.is_none());
    }

    #[test]
    fn command_names_are_case_insensitive() {
        let mut context = context();
        handle_line(&mut context, "BUDGET add Income 1000 Salary 2024-01-05").unwrap();
        assert_eq!(context.session.collection(CollectionKind::Budget).len(), 1);
        assert_eq!(
            context.last_command.as_deref(),
            Some("BUDGET add Income 1000 Salary 2024-01-05")
        );
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut context = context();
        assert_eq!(handle_line(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn completion_offers_matching_commands() {
        let helper = CommandNames::new(vec!["forecast", "expense", "exit"]);
        let history = DefaultHistory::new();
        let ctx = Context::new(&history);
        let (start, names) = helper.complete("  EX", 4, &ctx).unwrap();
        assert_eq!(start, 2);
        assert_eq!(names, vec!["exit", "expense"]);

        let (_, after_command) = helper.complete("forecast in", 11, &ctx).unwrap();
        assert!(after_command.is_empty());
    }
}
