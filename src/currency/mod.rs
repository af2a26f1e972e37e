use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Placeholder rendered for figures that cannot be computed yet.
pub const INSUFFICIENT_DATA: &str = "insufficient data";
const DISPLAY_PRECISION: usize = 2;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CurrencyCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

/// Locale-aware number preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    /// Thousands separator; amounts are ungrouped when unset.
    pub grouping_separator: Option<char>,
    pub date_format: DateFormatStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: None,
            date_format: DateFormatStyle::Iso,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum DateFormatStyle {
    /// `2024-01-12`
    #[default]
    Iso,
    /// `01/12/2024`
    UsNumeric,
    /// `12 Jan 2024`
    Medium,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" | "CAD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: usize) -> String {
    let body = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (body.as_str(), None),
    };
    let mut rendered = match locale.grouping_separator {
        Some(separator) => group_digits(int_part, separator),
        None => int_part.to_string(),
    };
    if let Some(frac_part) = frac_part {
        rendered.push(locale.decimal_separator);
        rendered.push_str(frac_part);
    }
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        rendered.insert(0, '-');
    }
    rendered
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped.chars().rev().collect()
}

/// Renders `amount` with the currency symbol and two decimals, e.g. `$3668.66`.
pub fn format_currency_value(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    negative_style: NegativeStyle,
) -> String {
    if !amount.is_finite() {
        return INSUFFICIENT_DATA.to_string();
    }
    let symbol = symbol_for(code.as_str());
    let body = format_number(locale, amount.abs(), DISPLAY_PRECISION);
    let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    match (negative, negative_style) {
        (false, _) => format!("{symbol}{body}"),
        (true, NegativeStyle::Sign) => format!("-{symbol}{body}"),
        (true, NegativeStyle::Parentheses) => format!("({symbol}{body})"),
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Iso => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::UsNumeric => date.format("%m/%d/%Y").to_string(),
        DateFormatStyle::Medium => format!(
            "{:02} {} {}",
            date.day(),
            month_label(date.month()),
            date.year()
        ),
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

/// Display settings bundled for repeated use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoneyFormatter {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub negative_style: NegativeStyle,
}

impl MoneyFormatter {
    pub fn new(code: CurrencyCode, locale: LocaleConfig, negative_style: NegativeStyle) -> Self {
        Self {
            code,
            locale,
            negative_style,
        }
    }

    pub fn amount(&self, value: f64) -> String {
        format_currency_value(value, &self.code, &self.locale, self.negative_style)
    }

    /// Like [`MoneyFormatter::amount`], rendering `None` as "insufficient data".
    pub fn optional(&self, value: Option<f64>) -> String {
        value.map_or_else(|| INSUFFICIENT_DATA.to_string(), |value| self.amount(value))
    }

    pub fn date(&self, date: NaiveDate) -> String {
        format_date(&self.locale, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formatting_matches_dollar_prefix() {
        let money = MoneyFormatter::default();
        assert_eq!(money.amount(3668.66), "$3668.66");
        assert_eq!(money.amount(1000.0), "$1000.00");
        assert_eq!(money.amount(-12.5), "-$12.50");
        assert_eq!(money.amount(-0.001), "$0.00");
    }

    #[test]
    fn unavailable_values_render_as_insufficient_data() {
        let money = MoneyFormatter::default();
        assert_eq!(money.optional(None), INSUFFICIENT_DATA);
        assert_eq!(money.amount(f64::NAN), INSUFFICIENT_DATA);
        assert_eq!(money.optional(Some(2.0)), "$2.00");
    }

    #[test]
    fn grouping_and_decimal_separators_follow_locale() {
        let locale = LocaleConfig {
            decimal_separator: ',',
            grouping_separator: Some('.'),
            ..LocaleConfig::default()
        };
        let money = MoneyFormatter::new(CurrencyCode::new("eur"), locale, NegativeStyle::Parentheses);
        assert_eq!(money.amount(1234567.891), "€1.234.567,89");
        assert_eq!(money.amount(-999.0), "(€999,00)");
    }

    #[test]
    fn dates_follow_the_configured_style() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let mut locale = LocaleConfig::default();
        assert_eq!(format_date(&locale, date), "2024-01-12");
        locale.date_format = DateFormatStyle::UsNumeric;
        assert_eq!(format_date(&locale, date), "01/12/2024");
        locale.date_format = DateFormatStyle::Medium;
        assert_eq!(format_date(&locale, date), "12 Jan 2024");
    }
}
