use std::collections::{BTreeMap, BTreeSet};

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub mod config;
pub mod entries;
pub mod forecast;
pub mod summary;
pub mod system;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut definitions = Vec::new();
    definitions.extend(entries::definitions());
    definitions.extend(summary::definitions());
    definitions.extend(forecast::definitions());
    definitions.extend(config::definitions());
    definitions.extend(system::definitions());
    definitions
}

/// Positional arguments plus `--name value` options and bare `--flag`s.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: BTreeMap<&'a str, &'a str>,
    flags: BTreeSet<&'a str>,
}

impl<'a> ParsedArgs<'a> {
    /// Splits `args`; anything starting with `--` must be listed in `valued` or `flags`.
    pub fn parse(
        args: &[&'a str],
        valued: &[&str],
        flags: &[&str],
    ) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(name) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            if valued.contains(&name) {
                let value = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`--{name}` expects a value"))
                })?;
                parsed.options.insert(name, value);
            } else if flags.contains(&name) {
                parsed.flags.insert(name);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `{arg}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<u32, CommandError> {
    raw.trim()
        .trim_start_matches('#')
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not an entry id")))
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("Usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_and_flags_are_separated_from_positionals() {
        let args = ["2024-03-01", "--amount", "1200", "--needs"];
        let parsed = ParsedArgs::parse(&args, &["amount"], &["needs", "wants"]).unwrap();
        assert_eq!(parsed.positional, vec!["2024-03-01"]);
        assert_eq!(parsed.option("amount"), Some("1200"));
        assert!(parsed.flag("needs"));
        assert!(!parsed.flag("wants"));
    }

    #[test]
    fn unknown_or_incomplete_options_are_rejected() {
        assert!(ParsedArgs::parse(&["--bogus"], &[], &[]).is_err());
        assert!(ParsedArgs::parse(&["--notes"], &["notes"], &[]).is_err());
    }

    #[test]
    fn ids_accept_an_optional_hash() {
        assert_eq!(parse_id("#3").unwrap(), 3);
        assert!(parse_id("three").is_err());
    }
}
