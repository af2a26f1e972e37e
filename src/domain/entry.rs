use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Classification of a ledger entry.
///
/// Budget collections only hold the four named kinds; expense collections may
/// carry any label, of which `Needs` and `Wants` are recognised for totals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryType {
    Income,
    Needs,
    Wants,
    Inflow,
    Other(String),
}

impl EntryType {
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "income" => EntryType::Income,
            "needs" => EntryType::Needs,
            "wants" => EntryType::Wants,
            "inflow" => EntryType::Inflow,
            _ => EntryType::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EntryType::Income => "Income",
            EntryType::Needs => "Needs",
            EntryType::Wants => "Wants",
            EntryType::Inflow => "Inflow",
            EntryType::Other(label) => label,
        }
    }

    pub fn is_budget_kind(&self) -> bool {
        !matches!(self, EntryType::Other(_))
    }

    /// Income and inflows raise net worth; every other kind lowers it.
    pub fn adds_to_net_worth(&self) -> bool {
        matches!(self, EntryType::Income | EntryType::Inflow)
    }

    pub fn sign(&self) -> char {
        match self {
            EntryType::Income => '+',
            EntryType::Inflow => '↑',
            _ => '-',
        }
    }
}

impl From<String> for EntryType {
    fn from(value: String) -> Self {
        EntryType::parse(&value)
    }
}

impl From<EntryType> for String {
    fn from(value: EntryType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recurrence marker recorded on an entry. Never expanded into occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recurring {
    Weekly,
    Biweekly,
    Monthly,
    Annually,
    #[default]
    None,
}

impl Recurring {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurring::Weekly => "Weekly",
            Recurring::Biweekly => "Biweekly",
            Recurring::Monthly => "Monthly",
            Recurring::Annually => "Annually",
            Recurring::None => "None",
        }
    }
}

impl FromStr for Recurring {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "weekly" => Recurring::Weekly,
            "biweekly" => Recurring::Biweekly,
            "monthly" => Recurring::Monthly,
            "annually" | "yearly" => Recurring::Annually,
            _ => Recurring::None,
        })
    }
}

impl From<String> for Recurring {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl From<Recurring> for String {
    fn from(value: Recurring) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Recurring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    #[serde(default)]
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurring>,
}

impl LedgerEntry {
    pub fn new(
        id: u32,
        kind: EntryType,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            kind,
            amount,
            category: category.into(),
            date,
            notes: None,
            recurring: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_recurring(mut self, recurring: Recurring) -> Self {
        self.recurring = Some(recurring);
        self
    }

    /// Whether the stored row still satisfies the entry invariants.
    pub fn is_well_formed(&self) -> bool {
        self.amount.is_finite() && self.amount >= 0.0 && !self.category.trim().is_empty()
    }

    /// One-line description, e.g. `#2 Needs 150.00 Rent (2024-01-10)`.
    pub fn label(&self) -> String {
        format!(
            "#{} {} {:.2} {} ({})",
            self.id,
            self.kind,
            self.amount,
            self.category,
            self.date.format(DATE_FORMAT)
        )
    }
}

/// Which entry types a collection accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePolicy {
    BudgetKinds,
    AnyLabel,
}

/// Raw form input for creating or editing an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub date: String,
    pub notes: String,
    pub recurring: String,
}

impl EntryDraft {
    pub fn new(
        kind: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_recurring(mut self, recurring: impl Into<String>) -> Self {
        self.recurring = recurring.into();
        self
    }

    /// Checks required fields and converts the draft into typed values.
    pub fn validate(&self, policy: TypePolicy) -> Result<ValidEntry, LedgerError> {
        let kind_label = self.kind.trim();
        if kind_label.is_empty() {
            return Err(LedgerError::Validation("type is required".into()));
        }
        let kind = EntryType::parse(kind_label);
        if policy == TypePolicy::BudgetKinds && !kind.is_budget_kind() {
            return Err(LedgerError::Validation(format!(
                "unknown budget type `{kind_label}` (expected Income, Needs, Wants or Inflow)"
            )));
        }

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| LedgerError::Validation(format!("`{}` is not a number", self.amount)))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(LedgerError::Validation("amount must be greater than zero".into()));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(LedgerError::Validation("category is required".into()));
        }

        let date_text = self.date.trim();
        if date_text.is_empty() {
            return Err(LedgerError::Validation("date is required".into()));
        }
        let date = NaiveDate::parse_from_str(date_text, DATE_FORMAT).map_err(|_| {
            LedgerError::Validation(format!("`{date_text}` is not a YYYY-MM-DD date"))
        })?;

        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);
        let recurring = Some(self.recurring.trim())
            .filter(|value| !value.is_empty())
            .map(|value| Recurring::from(value.to_string()));

        Ok(ValidEntry {
            kind,
            amount,
            category: category.to_string(),
            date,
            notes,
            recurring,
        })
    }
}

/// A draft that passed validation; becomes an entry once it receives an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidEntry {
    pub kind: EntryType,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub recurring: Option<Recurring>,
}

impl ValidEntry {
    pub fn into_entry(self, id: u32) -> LedgerEntry {
        LedgerEntry {
            id,
            kind: self.kind,
            amount: self.amount,
            category: self.category,
            date: self.date,
            notes: self.notes,
            recurring: self.recurring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_parsing_is_case_insensitive() {
        assert_eq!(EntryType::parse("income"), EntryType::Income);
        assert_eq!(EntryType::parse(" Wants "), EntryType::Wants);
        assert_eq!(
            EntryType::parse("Groceries"),
            EntryType::Other("Groceries".into())
        );
    }

    #[test]
    fn draft_rejects_non_positive_amount() {
        let draft = EntryDraft::new("Needs", "0", "Rent", "2024-01-01");
        let err = draft.validate(TypePolicy::BudgetKinds).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref msg) if msg.contains("greater than zero")));

        let draft = EntryDraft::new("Needs", "abc", "Rent", "2024-01-01");
        assert!(draft.validate(TypePolicy::BudgetKinds).is_err());
    }

    #[test]
    fn draft_requires_category_and_date() {
        let missing_category = EntryDraft::new("Income", "10", "  ", "2024-01-01");
        assert!(missing_category.validate(TypePolicy::BudgetKinds).is_err());

        let missing_date = EntryDraft::new("Income", "10", "Salary", "");
        assert!(missing_date.validate(TypePolicy::BudgetKinds).is_err());

        let bad_date = EntryDraft::new("Income", "10", "Salary", "2024-13-40");
        assert!(bad_date.validate(TypePolicy::BudgetKinds).is_err());
    }

    #[test]
    fn budget_policy_rejects_free_form_labels() {
        let draft = EntryDraft::new("Groceries", "12.5", "Food", "2024-02-01");
        assert!(draft.validate(TypePolicy::BudgetKinds).is_err());
        let valid = draft.validate(TypePolicy::AnyLabel).unwrap();
        assert_eq!(valid.kind, EntryType::Other("Groceries".into()));
    }

    #[test]
    fn optional_fields_are_trimmed_or_dropped() {
        let valid = EntryDraft::new("Wants", "20", "Games", "2024-03-03")
            .with_notes("   ")
            .with_recurring("monthly")
            .validate(TypePolicy::AnyLabel)
            .unwrap();
        assert_eq!(valid.notes, None);
        assert_eq!(valid.recurring, Some(Recurring::Monthly));
    }

    #[test]
    fn entry_serializes_with_type_field() {
        let entry = LedgerEntry::new(
            1,
            EntryType::Income,
            1000.0,
            "Salary",
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"Income\""));
        assert!(json.contains("\"date\":\"2024-01-05\""));
    }

    #[test]
    fn unknown_recurring_values_decode_as_none() {
        let json = r#"{"id":1,"type":"Rent","amount":900,"category":"Home","date":"2024-01-01","recurring":"Yes"}"#;
        let entry: LedgerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.recurring, Some(Recurring::None));
    }
}
