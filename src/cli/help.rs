use crate::cli::io;
use crate::cli::output::{detail, section};
use crate::cli::registry::{CommandEntry, CommandRegistry};

pub fn print_overview(registry: &CommandRegistry) {
    section("Available commands");
    for entry in registry.list() {
        detail(format!("  {:<12} {}", entry.name, entry.description));
    }
    io::print_hint("Use `help <command>` for details. Press Tab or ? to complete command names.");
}

pub fn print_command(entry: &CommandEntry) {
    section(format!("Help: {}", entry.name));
    detail(format!("  Description: {}", entry.description));
    for (index, usage) in entry.usage.lines().enumerate() {
        let label = if index == 0 { "  Usage:" } else { "        " };
        detail(format!("{label} {}", usage.trim()));
    }
}
