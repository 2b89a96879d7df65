//! Invoice record models produced by the extraction state machine.
//!
//! Line items are deliberately denormalized: each item carries a snapshot of
//! the header state at the moment it was appended, because the downstream
//! consumer is a flat one-row-per-item table, not a header/detail join.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::customers::CustomerRecord;

/// A complete extracted invoice: header plus ordered line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice header information.
    pub header: InvoiceHeader,

    /// Line items, in document order.
    pub items: Vec<LineItem>,
}

/// Invoice header fields, mutated incrementally as lines are classified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Invoice date, normalized where possible.
    pub date: InvoiceDate,

    /// Invoice number/identifier.
    pub invoice_number: String,

    /// Customer purchase order reference.
    pub purchase_order: String,

    /// Bill-to party: the first customer identified in the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_to: Option<CustomerRecord>,

    /// Ship-to party: the second distinct customer identified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_to: Option<CustomerRecord>,

    /// Up to 3 delivery address lines following the ship-to party.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ship_to_address: Vec<String>,
}

/// An invoice date: either a parsed day or the raw OCR text when parsing
/// failed. Raw text is retained rather than discarded (never fatal).
///
/// Serializes as its display string; deserialization re-parses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceDate {
    /// Successfully parsed date.
    Day(NaiveDate),
    /// Unparseable OCR text, kept verbatim.
    Raw(String),
}

impl Default for InvoiceDate {
    fn default() -> Self {
        Self::Raw(String::new())
    }
}

impl fmt::Display for InvoiceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(d) => write!(f, "{}", d.format("%d/%m/%Y")),
            Self::Raw(s) => f.write_str(s),
        }
    }
}

impl Serialize for InvoiceDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InvoiceDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match NaiveDate::parse_from_str(&s, "%d/%m/%Y") {
            Ok(date) => Self::Day(date),
            Err(_) => Self::Raw(s),
        })
    }
}

/// A single captured line item, stamped with the header state at append time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Item description, possibly grown by continuation lines.
    pub description: String,

    /// Quantity from the first token of the row.
    pub quantity: u64,

    /// Unit cost from the second-to-last token, best effort.
    pub unit_amount: Decimal,

    /// Line amount from the last token.
    pub amount: Decimal,

    /// Tax-inclusive amount. The source documents do not separate tax, so
    /// this always equals `amount`.
    pub inc_tax_amount: Decimal,

    /// Header/party state as it stood when this item was appended.
    pub header: HeaderSnapshot,
}

/// Denormalized copy of the header fields stamped onto each line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderSnapshot {
    /// Invoice date as a display string.
    pub date: String,

    /// Invoice number.
    pub invoice_number: String,

    /// Customer purchase order.
    pub purchase_order: String,

    /// Bill-to customer display name.
    pub bill_to_name: String,

    /// Bill-to customer ledger identifier.
    pub customer_id: String,

    /// Ship-to lines: party name first, then up to 3 address lines.
    pub ship_to_lines: [String; 4],
}

impl InvoiceHeader {
    /// Snapshot the header for stamping onto a line item.
    pub fn snapshot(&self) -> HeaderSnapshot {
        let mut ship_to_lines: [String; 4] = Default::default();
        if let Some(ship_to) = &self.ship_to {
            ship_to_lines[0] = ship_to.display_name.clone();
        }
        for (slot, line) in ship_to_lines[1..].iter_mut().zip(&self.ship_to_address) {
            *slot = line.clone();
        }

        HeaderSnapshot {
            date: self.date.to_string(),
            invoice_number: self.invoice_number.clone(),
            purchase_order: self.purchase_order.clone(),
            bill_to_name: self
                .bill_to
                .as_ref()
                .map(|c| c.display_name.clone())
                .unwrap_or_default(),
            customer_id: self
                .bill_to
                .as_ref()
                .map(|c| c.customer_id.clone())
                .unwrap_or_default(),
            ship_to_lines,
        }
    }
}
