//! Line classification over OCR-produced invoice text.
//!
//! Every decision here is literal substring containment against the marker
//! strings in [`MarkerConfig`]; OCR output is too noisy for anything with
//! tighter anchoring to survive contact with real scans.

use crate::customers::{CustomerDirectory, CustomerRecord};
use crate::models::config::MarkerConfig;

/// What kind of line the classifier saw.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind<'a> {
    /// A labeled header field and its raw value (text after the last colon).
    HeaderField(HeaderFieldKind, String),

    /// A section boundary marker.
    SectionMarker(SectionKind),

    /// A line containing a known customer's display name.
    CustomerMention(&'a CustomerRecord),

    /// A row shaped like `<qty> ... <amount>` inside the item-capture region.
    ItemCandidate,

    /// Anything else.
    PlainText,
}

/// Which header field a line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderFieldKind {
    Date,
    InvoiceNumber,
    PurchaseOrder,
}

/// Section boundaries recognized in the line stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// "Invoice to:" / "Ship to:" — opens a party-designation region.
    Party,
    /// "Material Number" header row — opens the item-capture region.
    ItemsOpen,
    /// "Direct deposit details:" footer — closes the item-capture region.
    ItemsClose,
}

/// Classifies one line at a time against a marker set and customer directory.
pub struct LineClassifier<'a> {
    markers: &'a MarkerConfig,
    customers: &'a CustomerDirectory,
}

impl<'a> LineClassifier<'a> {
    pub fn new(markers: &'a MarkerConfig, customers: &'a CustomerDirectory) -> Self {
        Self { markers, customers }
    }

    /// Classify a single line. `in_items` is carried state from the caller:
    /// item candidates only exist inside the item-capture region.
    ///
    /// Checks run in a fixed order: header fields (Date, Invoice, Purchase
    /// Order), section markers, customer mentions, item candidates. First
    /// match wins; no line satisfies more than one.
    pub fn classify(&self, line: &str, in_items: bool) -> LineKind<'a> {
        if line.contains(&self.markers.date) {
            return LineKind::HeaderField(HeaderFieldKind::Date, last_colon_value(line));
        }
        if line.contains(&self.markers.invoice) {
            return LineKind::HeaderField(HeaderFieldKind::InvoiceNumber, last_colon_value(line));
        }
        if line.contains(&self.markers.purchase_order) {
            return LineKind::HeaderField(HeaderFieldKind::PurchaseOrder, last_colon_value(line));
        }

        if self.markers.items_open.iter().any(|m| line.contains(m)) {
            return LineKind::SectionMarker(SectionKind::ItemsOpen);
        }
        if line.contains(&self.markers.items_close) {
            return LineKind::SectionMarker(SectionKind::ItemsClose);
        }
        if self.markers.party.iter().any(|m| line.contains(m)) {
            return LineKind::SectionMarker(SectionKind::Party);
        }

        if let Some(customer) = self.customers.find_mention(line) {
            return LineKind::CustomerMention(customer);
        }

        if in_items && is_item_candidate(line) {
            return LineKind::ItemCandidate;
        }

        LineKind::PlainText
    }
}

/// Everything after the last colon on the line, trimmed. OCR noise before the
/// label is common, so splitting on the last colon keeps the value clean.
fn last_colon_value(line: &str) -> String {
    line.rsplit(':').next().unwrap_or(line).trim().to_string()
}

/// Does the line look like `<qty> ... <amount>`? First token all digits, last
/// token all digits after stripping commas, a leading `$`, and the decimal
/// point. Lines with fewer than 2 tokens never qualify.
pub fn is_item_candidate(line: &str) -> bool {
    let mut tokens = line.split_whitespace();
    let (Some(first), Some(last)) = (tokens.next(), tokens.next_back()) else {
        return false;
    };

    if !all_digits(first) {
        return false;
    }

    let stripped: String = last
        .strip_prefix('$')
        .unwrap_or(last)
        .chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect();
    all_digits(&stripped)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
