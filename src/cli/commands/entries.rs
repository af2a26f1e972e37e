use crate::cli::commands::{parse_id, usage_error, ParsedArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{detail, section};
use crate::cli::registry::CommandEntry;
use crate::core::services::EntryService;
use crate::domain::entry::{EntryDraft, LedgerEntry, Recurring};
use crate::ledger::CollectionKind;

const BUDGET_USAGE: &str = "budget list
budget add <Income|Needs|Wants|Inflow> <amount> <category> <YYYY-MM-DD> [--notes TEXT] [--recurring FREQ]
budget edit <id> <type> <amount> <category> <YYYY-MM-DD> [--notes TEXT] [--recurring FREQ]
budget delete <id>";

const EXPENSE_USAGE: &str = "expense list
expense add <Needs|Wants> <amount> <category> <YYYY-MM-DD> [--notes TEXT] [--recurring FREQ]
expense edit <id> <type> <amount> <category> <YYYY-MM-DD> [--notes TEXT] [--recurring FREQ]
expense delete <id>";

const DRAFT_OPTIONS: [&str; 2] = ["notes", "recurring"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "budget",
            "List or change budget entries (income, inflows, planned spending)",
            BUDGET_USAGE,
            cmd_budget,
        ),
        CommandEntry::new(
            "expense",
            "List or change projected expenses",
            EXPENSE_USAGE,
            cmd_expense,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run(context, CollectionKind::Budget, BUDGET_USAGE, args)
}

fn cmd_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    run(context, CollectionKind::Expense, EXPENSE_USAGE, args)
}

fn run(
    context: &mut ShellContext,
    kind: CollectionKind,
    usage: &str,
    args: &[&str],
) -> CommandResult {
    let (action, rest) = match args.split_first() {
        Some((action, rest)) => (action.to_lowercase(), rest),
        None => ("list".to_string(), args),
    };
    match action.as_str() {
        "list" | "ls" => list(context, kind),
        "add" => add(context, kind, usage, rest),
        "edit" => edit(context, kind, usage, rest),
        "delete" | "remove" | "rm" => delete(context, kind, usage, rest),
        _ => Err(usage_error(usage)),
    }
}

fn list(context: &mut ShellContext, kind: CollectionKind) -> CommandResult {
    let money = context.money();
    let entries = EntryService::list(context.session.ledger(), kind);
    section(format!("{} entries", title(kind)));
    if entries.is_empty() {
        io::print_info("No entries yet.");
        return Ok(());
    }
    for entry in entries {
        detail(format_row(entry, &money.amount(entry.amount), &money.date(entry.date)));
    }
    Ok(())
}

fn format_row(entry: &LedgerEntry, amount: &str, date: &str) -> String {
    let mut row = format!(
        "  #{:<3} {}  {:<8} {:>12}  {}",
        entry.id, date, entry.kind, amount, entry.category
    );
    if let Some(recurring) = entry.recurring.filter(|r| *r != Recurring::None) {
        row.push_str(&format!("  [{}]", recurring));
    }
    if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
        row.push_str(&format!("  ({})", notes));
    }
    row
}

fn add(context: &mut ShellContext, kind: CollectionKind, usage: &str, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &DRAFT_OPTIONS, &[])?;
    let draft = if parsed.positional.is_empty() && context.is_interactive() {
        prompt_draft(context, kind, EntryDraft::default())?
    } else {
        draft_from_args(&parsed.positional, &parsed, usage)?
    };
    let id = context.session.add_entry(kind, &draft)?;
    io::print_success(format!("Added {} entry #{}.", kind, id));
    Ok(())
}

fn edit(context: &mut ShellContext, kind: CollectionKind, usage: &str, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &DRAFT_OPTIONS, &[])?;
    let (raw_id, fields) = parsed.positional.split_first().ok_or_else(|| usage_error(usage))?;
    let id = parse_id(raw_id)?;

    let draft = if fields.is_empty() && context.is_interactive() {
        let current = EntryService::draft_from(context.session.entry(kind, id)?);
        prompt_draft(context, kind, current)?
    } else {
        draft_from_args(fields, &parsed, usage)?
    };
    context.session.edit_entry(kind, id, &draft)?;
    io::print_success(format!("Updated {} entry #{}.", kind, id));
    Ok(())
}

fn delete(context: &mut ShellContext, kind: CollectionKind, usage: &str, args: &[&str]) -> CommandResult {
    let raw_id = args.first().ok_or_else(|| usage_error(usage))?;
    let id = parse_id(raw_id)?;
    let label = context.session.entry(kind, id)?.label();
    if !context.confirm(&format!("Delete {} entry {}?", kind, label))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    let removed = context.session.delete_entry(kind, id)?;
    io::print_success(format!(
        "Deleted {} entry #{} ({}). Remaining entries were renumbered.",
        kind, id, removed.category
    ));
    Ok(())
}

fn draft_from_args(
    fields: &[&str],
    parsed: &ParsedArgs<'_>,
    usage: &str,
) -> Result<EntryDraft, CommandError> {
    let mut draft = match fields {
        [entry_type, amount, category, date] => EntryDraft::new(*entry_type, *amount, *category, *date),
        _ => return Err(usage_error(usage)),
    };
    if let Some(notes) = parsed.option("notes") {
        draft = draft.with_notes(notes);
    }
    if let Some(recurring) = parsed.option("recurring") {
        draft = draft.with_recurring(recurring);
    }
    Ok(draft)
}

fn prompt_draft(
    context: &ShellContext,
    kind: CollectionKind,
    current: EntryDraft,
) -> Result<EntryDraft, CommandError> {
    let theme = &context.theme;
    let type_prompt = match kind {
        CollectionKind::Budget => "Type (Income, Needs, Wants, Inflow)",
        CollectionKind::Expense => "Type (Needs, Wants)",
    };
    let initial = |value: &str| (!value.is_empty()).then(|| value.to_string());

    let entry_type = io::prompt_text(theme, type_prompt, initial(&current.kind).as_deref(), false)?;
    let amount = io::prompt_text(theme, "Amount", initial(&current.amount).as_deref(), false)?;
    let category = io::prompt_text(theme, "Category", initial(&current.category).as_deref(), false)?;
    let date = io::prompt_text(theme, "Date (YYYY-MM-DD)", initial(&current.date).as_deref(), false)?;
    let notes = io::prompt_text(theme, "Notes", initial(&current.notes).as_deref(), true)?;
    let recurring = io::prompt_text(
        theme,
        "Recurring (None, Weekly, Biweekly, Monthly, Annually)",
        initial(&current.recurring).as_deref(),
        true,
    )?;

    Ok(EntryDraft::new(entry_type, amount, category, date)
        .with_notes(notes)
        .with_recurring(recurring))
}

fn title(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Budget => "Budget",
        CollectionKind::Expense => "Expense",
    }
}
