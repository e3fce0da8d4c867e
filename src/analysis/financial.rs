//! Financial figure extraction
//!
//! Currency-prefixed ("$1,200", "R 500", "USD 40k") and currency-suffixed
//! ("300 dollars") amounts. A match whose number will not parse is skipped.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::ops::Range;
use tracing::debug;

use crate::model::{FinancialFigure, Statement};
use crate::utils::excerpt;
use crate::utils::text::significant_words;

lazy_static! {
    static ref PREFIXED: Regex = Regex::new(
        r"(?:(\$|€|£|¥)|\b(USD|EUR|GBP|ZAR|R))\s?(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s?((?i:thousand|million|billion|bn|k|m))?\b"
    )
    .unwrap();
    static ref SUFFIXED: Regex = Regex::new(
        r"\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?)\s?((?i:thousand|million|billion|bn|k|m))?\s?((?i:dollars|usd|euros|eur|pounds|gbp|rand|zar))\b"
    )
    .unwrap();
}

/// Words that name money rather than what the money was for
const CURRENCY_WORDS: &[&str] = &[
    "usd", "eur", "gbp", "zar", "dollars", "dollar", "euros", "euro", "pounds", "pound", "rand",
    "thousand", "million", "billion",
];

const CONTEXT_WORDS: usize = 4;

fn currency_code(symbol: &str) -> &'static str {
    match symbol.to_lowercase().as_str() {
        "$" | "usd" | "dollars" => "USD",
        "€" | "eur" | "euros" => "EUR",
        "£" | "gbp" | "pounds" => "GBP",
        "¥" => "JPY",
        _ => "ZAR",
    }
}

fn multiplier(suffix: Option<&str>) -> f64 {
    match suffix.map(str::to_lowercase).as_deref() {
        Some("k") | Some("thousand") => 1_000.0,
        Some("m") | Some("million") => 1_000_000.0,
        Some("bn") | Some("billion") => 1_000_000_000.0,
        _ => 1.0,
    }
}

fn parse_amount(digits: &str, suffix: Option<&str>) -> Option<f64> {
    let value: f64 = digits.replace(',', "").parse().ok()?;
    let amount = value * multiplier(suffix);
    amount.is_finite().then_some(amount)
}

/// Grouping key for drift detection: the statement's first sorted
/// significant words, ignoring currency vocabulary
pub fn figure_context(text: &str) -> String {
    let mut words: Vec<String> = significant_words(text)
        .into_iter()
        .filter(|w| !CURRENCY_WORDS.contains(&w.as_str()))
        .collect();
    words.sort();
    words.dedup();
    words.truncate(CONTEXT_WORDS);
    words.join(" ")
}

struct RawFigure {
    span: Range<usize>,
    amount: f64,
    currency: &'static str,
}

fn prefixed(caps: &Captures) -> Option<RawFigure> {
    let whole = caps.get(0)?;
    let symbol = caps.get(1).or_else(|| caps.get(2))?.as_str();
    let amount = parse_amount(caps.get(3)?.as_str(), caps.get(4).map(|m| m.as_str()));
    match amount {
        Some(amount) => Some(RawFigure { span: whole.range(), amount, currency: currency_code(symbol) }),
        None => {
            debug!("Skipping unparseable amount '{}'", whole.as_str());
            None
        }
    }
}

fn suffixed(caps: &Captures) -> Option<RawFigure> {
    let whole = caps.get(0)?;
    let amount = parse_amount(caps.get(1)?.as_str(), caps.get(2).map(|m| m.as_str()));
    match amount {
        Some(amount) => Some(RawFigure {
            span: whole.range(),
            amount,
            currency: currency_code(caps.get(3)?.as_str()),
        }),
        None => {
            debug!("Skipping unparseable amount '{}'", whole.as_str());
            None
        }
    }
}

/// Every monetary amount mentioned in `statement`, in order of appearance
pub fn extract_figures(statement: &Statement) -> Vec<FinancialFigure> {
    let text = statement.text.as_str();

    let mut raw: Vec<RawFigure> = PREFIXED.captures_iter(text).filter_map(|c| prefixed(&c)).collect();
    let taken: Vec<Range<usize>> = raw.iter().map(|f| f.span.clone()).collect();
    raw.extend(
        SUFFIXED
            .captures_iter(text)
            .filter_map(|c| suffixed(&c))
            .filter(|f| !taken.iter().any(|t| t.start < f.span.end && f.span.start < t.end)),
    );
    raw.sort_by_key(|f| f.span.start);

    if raw.is_empty() {
        return Vec::new();
    }

    let context = figure_context(text);
    let description = excerpt(text, 120);
    raw.into_iter()
        .map(|f| FinancialFigure {
            statement_id: statement.id.clone(),
            amount: f.amount,
            currency: f.currency.to_string(),
            description: description.clone(),
            context: context.clone(),
            timestamp: statement.timestamp,
            document_id: statement.document_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawStatement;

    fn figures(text: &str) -> Vec<FinancialFigure> {
        let stmt = Statement::from_raw(RawStatement::new("alice", text, "doc"), "alice", 0);
        extract_figures(&stmt)
    }

    #[test]
    fn test_prefixed_amounts() {
        let found = figures("I paid $1,000 for the car repairs and €250.50 for parts");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].amount, 1000.0);
        assert_eq!(found[0].currency, "USD");
        assert_eq!(found[1].amount, 250.5);
        assert_eq!(found[1].currency, "EUR");
    }

    #[test]
    fn test_suffixed_and_multiplied_amounts() {
        let found = figures("He owes me 300 dollars and another R 2k");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].amount, 300.0);
        assert_eq!(found[0].currency, "USD");
        assert_eq!(found[1].amount, 2000.0);
        assert_eq!(found[1].currency, "ZAR");
    }

    #[test]
    fn test_prefix_and_suffix_do_not_double_count() {
        let found = figures("The fee was USD 40 dollars");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 40.0);
    }

    #[test]
    fn test_context_ignores_amounts() {
        assert_eq!(
            figure_context("I paid $1,000 for the car repairs"),
            figure_context("I paid $1,600 for the car repairs")
        );
        assert_eq!(figure_context("I paid 300 dollars for the car repairs"), "car paid repairs");
    }

    #[test]
    fn test_no_money_no_figures() {
        assert!(figures("We met on Monday").is_empty());
        assert!(figures("Room 12 on floor 3").is_empty());
    }
}
