//! Item-row tokenization and validation.
//!
//! Replaces positional slicing over a raw token list with a named-field row
//! and digit checks at the boundary. Rejection is a value, not a panic: the
//! state machine folds rejected rows into the previous item's description.

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ItemReject;
use crate::models::config::TemplateConfig;

/// A validated item row before header stamping.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Quantity from the first token.
    pub quantity: u64,

    /// Material number, empty on rows too short to carry the column.
    pub material_number: String,

    /// Canonicalized description.
    pub description: String,

    /// Unit cost from the second-to-last token, best effort.
    pub unit_amount: Decimal,

    /// Line amount from the last token.
    pub amount: Decimal,
}

/// Parse one whitespace-tokenized item row.
///
/// Requires at least 2 tokens, an all-digit first token (quantity) and a
/// last token that is all digits once commas, a leading `$`, and the decimal
/// point are stripped. Rows failing either check are rejected with a reason.
pub fn parse_item_line(tokens: &[&str], template: &TemplateConfig) -> Result<ParsedRow, ItemReject> {
    if tokens.len() < 2 {
        return Err(ItemReject::TooFewTokens(tokens.len()));
    }

    let qty_token = tokens[0];
    if !qty_token.chars().all(|c| c.is_ascii_digit()) {
        return Err(ItemReject::NonNumericQuantity(qty_token.to_string()));
    }
    // All-digit quantities always parse; absurdly long OCR runs saturate
    // rather than rejecting an otherwise valid row.
    let quantity: u64 = qty_token.parse().unwrap_or_else(|_| {
        debug!(token = qty_token, "quantity overflows u64, saturating");
        u64::MAX
    });

    let amount_token = tokens[tokens.len() - 1];
    let amount_str = normalize_amount(amount_token);
    if !amount_str
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.')
        || amount_str.chars().all(|c| c == '.')
        || amount_str.is_empty()
    {
        return Err(ItemReject::NonNumericAmount(amount_token.to_string()));
    }
    let amount = Decimal::from_str(&amount_str)
        .map_err(|_| ItemReject::UnparseableAmount(amount_token.to_string()))?;

    // Unit cost is positional, not validated; a garbled token degrades to
    // zero rather than rejecting an otherwise valid row.
    let unit_token = tokens[tokens.len() - 2];
    let unit_amount = Decimal::from_str(&normalize_amount(unit_token)).unwrap_or_else(|_| {
        debug!(token = unit_token, "unparseable unit cost, defaulting to 0");
        Decimal::ZERO
    });

    // Rows long enough carry a material number in the second column; the
    // threshold varies per customer template.
    let (material_number, body) = if tokens.len() >= template.material_number_min_tokens {
        (tokens[1].to_string(), &tokens[2..tokens.len() - 2])
    } else {
        (String::new(), &tokens[1..tokens.len() - 1])
    };
    let raw_description = body.join(" ");

    // Freight lines carry no material number and keep their wording.
    let description = if raw_description.contains("Freight") {
        raw_description.trim().to_string()
    } else {
        format!("{} - {} x {}", material_number, raw_description.trim(), quantity)
    };

    Ok(ParsedRow {
        quantity,
        material_number,
        description,
        unit_amount,
        amount,
    })
}

/// Strip commas and a leading `$` from a money token.
fn normalize_amount(token: &str) -> String {
    token
        .strip_prefix('$')
        .unwrap_or(token)
        .replace(',', "")
}
