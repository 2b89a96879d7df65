//! The extraction state machine: a stateful fold over classified lines.
//!
//! Every transition is an explicit case over `(ParseState, LineKind)` rather
//! than nested conditional fallthrough. The machine never fails: a garbled
//! document yields a record with whatever partial data was captured.

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, warn};

use crate::customers::{CustomerDirectory, CustomerRecord};
use crate::models::config::ScaninvConfig;
use crate::models::invoice::{InvoiceDate, InvoiceHeader, InvoiceRecord, LineItem};

use super::classifier::{HeaderFieldKind, LineClassifier, LineKind, SectionKind};
use super::items::parse_item_line;

/// Parse state, advanced strictly in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Reading header fields; no party section seen yet.
    AwaitingHeader,
    /// A party section marker was seen; the bill-to customer is still open.
    AwaitingFirstParty,
    /// Bill-to bound and final; looking for the ship-to customer.
    AwaitingSecondParty,
    /// Inside the item-capture region.
    CapturingItems,
    /// Items closed; later lines contribute nothing.
    Done,
}

/// Line-oriented field extraction over a single document.
pub struct ExtractionStateMachine<'a> {
    customers: &'a CustomerDirectory,
    config: &'a ScaninvConfig,
    /// Reference date for the accounting-period normalization rule.
    today: NaiveDate,

    state: ParseState,
    header: InvoiceHeader,
    items: Vec<LineItem>,
    /// Ship-to address lines still wanted after the second mention.
    address_remaining: usize,
}

impl<'a> ExtractionStateMachine<'a> {
    pub fn new(customers: &'a CustomerDirectory, config: &'a ScaninvConfig) -> Self {
        Self {
            customers,
            config,
            today: Local::now().date_naive(),
            state: ParseState::AwaitingHeader,
            header: InvoiceHeader::default(),
            items: Vec::new(),
            address_remaining: 0,
        }
    }

    /// Pin the reference date used for date normalization. Tests use this;
    /// production runs take the system clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Current parse state.
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Fold the whole document and produce the finished record.
    pub fn run(mut self, text: &str) -> InvoiceRecord {
        let classifier = LineClassifier::new(&self.config.markers, self.customers);

        for line in text.lines() {
            let in_items = self.state == ParseState::CapturingItems;
            let kind = classifier.classify(line, in_items);
            self.step(line, kind);
        }

        debug!(
            items = self.items.len(),
            invoice = %self.header.invoice_number,
            "document fold complete"
        );

        InvoiceRecord {
            header: self.header,
            items: self.items,
        }
    }

    /// Advance the machine by one classified line.
    fn step(&mut self, line: &str, kind: LineKind<'_>) {
        if self.state == ParseState::Done {
            return;
        }

        match kind {
            // Header fields update unconditionally in every non-terminal
            // state; OCR noise can duplicate a label, and last write wins.
            LineKind::HeaderField(field, value) => self.apply_header_field(field, value),

            LineKind::SectionMarker(SectionKind::Party) => {
                if self.state == ParseState::AwaitingHeader {
                    self.state = ParseState::AwaitingFirstParty;
                }
            }

            LineKind::SectionMarker(SectionKind::ItemsOpen) => {
                // The item table header doubles as the early stop for
                // address capture.
                self.address_remaining = 0;
                self.state = ParseState::CapturingItems;
                debug!("item capture opened");
            }

            // The deposit-details footer only closes an open item region; a
            // stray footer earlier in the stream is ignored.
            LineKind::SectionMarker(SectionKind::ItemsClose) => {
                if self.state == ParseState::CapturingItems {
                    debug!("item capture closed");
                    self.state = ParseState::Done;
                }
            }

            LineKind::CustomerMention(customer) => self.bind_mentions(line, customer),

            LineKind::ItemCandidate => self.capture_item(line),

            LineKind::PlainText => self.plain_text(line),
        }
    }

    fn apply_header_field(&mut self, field: HeaderFieldKind, value: String) {
        match field {
            HeaderFieldKind::Date => self.header.date = self.normalize_date(value),
            HeaderFieldKind::InvoiceNumber => self.header.invoice_number = value,
            HeaderFieldKind::PurchaseOrder => self.header.purchase_order = value,
        }
    }

    /// Day/month/year parse with the accounting-period correction: a parsed
    /// date outside the current month/year is rewritten to the first day of
    /// the current month. OCR-misread and stale dates land in the open
    /// period instead of a closed one.
    fn normalize_date(&self, raw: String) -> InvoiceDate {
        match NaiveDate::parse_from_str(&raw, "%d/%m/%Y") {
            Ok(date) => {
                if date.month() != self.today.month() || date.year() != self.today.year() {
                    let corrected = self.today.with_day(1).unwrap_or(self.today);
                    debug!(%raw, corrected = %corrected, "date moved to start of current period");
                    InvoiceDate::Day(corrected)
                } else {
                    InvoiceDate::Day(date)
                }
            }
            Err(_) => {
                warn!(%raw, "unparseable date, keeping raw text");
                InvoiceDate::Raw(raw)
            }
        }
    }

    /// Bind every distinct customer found on the line, scanning left to
    /// right past each match: some layouts put both parties on the single
    /// line following "Ship to:". A mention that binds nothing is fed back
    /// through the plain-text path so address capture and continuation
    /// folding still see the line.
    fn bind_mentions(&mut self, line: &str, first: &CustomerRecord) {
        let customers = self.customers;
        let bound_before = (self.header.bill_to.is_some(), self.header.ship_to.is_some());

        self.bind_party(first);
        let mut rest = line
            .find(first.display_name.as_str())
            .map(|pos| &line[pos + first.display_name.len()..])
            .unwrap_or("");
        while self.header.ship_to.is_none() {
            let Some(next) = customers.find_mention(rest) else {
                break;
            };
            self.bind_party(next);
            match rest.find(next.display_name.as_str()) {
                Some(pos) => rest = &rest[pos + next.display_name.len()..],
                None => break,
            }
        }

        let bound_after = (self.header.bill_to.is_some(), self.header.ship_to.is_some());
        if bound_before == bound_after {
            self.plain_text(line);
        }
    }

    /// First mention anywhere binds bill-to and is final; the second distinct
    /// mention binds ship-to and starts address capture. Anything later is
    /// ignored.
    fn bind_party(&mut self, customer: &CustomerRecord) {
        if self.header.bill_to.is_none() {
            debug!(customer = %customer.display_name, "bound bill-to party");
            self.header.bill_to = Some(customer.clone());
            if matches!(
                self.state,
                ParseState::AwaitingHeader | ParseState::AwaitingFirstParty
            ) {
                self.state = ParseState::AwaitingSecondParty;
            }
            return;
        }

        let bill_to = self.header.bill_to.as_ref().unwrap();
        if self.header.ship_to.is_none() && customer != bill_to {
            debug!(customer = %customer.display_name, "bound ship-to party");
            self.header.ship_to = Some(customer.clone());
            self.address_remaining = self.config.template.address_line_limit;
        }
    }

    fn capture_item(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match parse_item_line(&tokens, &self.config.template) {
            Ok(row) => {
                self.items.push(LineItem {
                    description: row.description,
                    quantity: row.quantity,
                    unit_amount: row.unit_amount,
                    amount: row.amount,
                    inc_tax_amount: row.amount,
                    header: self.header.snapshot(),
                });
            }
            Err(reject) => {
                // Not an item row after all; fold it into the previous
                // item's description rather than dropping it.
                warn!(%reject, line = line.trim(), "item row rejected");
                self.fold_continuation(line);
            }
        }
    }

    fn plain_text(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        if self.state == ParseState::CapturingItems {
            self.fold_continuation(line);
            return;
        }

        if self.address_remaining > 0 {
            self.header.ship_to_address.push(trimmed.to_string());
            self.address_remaining -= 1;
        }
    }

    /// Append a wrapped description remainder to the most recent item.
    fn fold_continuation(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(last) = self.items.last_mut() {
            last.description.push(' ');
            last.description.push_str(trimmed);
        }
    }
}

/// Convenience entry point: fold one document with the given directory and
/// configuration.
pub fn extract_record(
    text: &str,
    customers: &CustomerDirectory,
    config: &ScaninvConfig,
) -> InvoiceRecord {
    ExtractionStateMachine::new(customers, config).run(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn machine<'a>(
        customers: &'a CustomerDirectory,
        config: &'a ScaninvConfig,
    ) -> ExtractionStateMachine<'a> {
        // June 2024 so the end-to-end scenario date is in-period.
        ExtractionStateMachine::new(customers, config)
            .with_today(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
    }

    fn run(text: &str) -> InvoiceRecord {
        let customers = CustomerDirectory::builtin();
        let config = ScaninvConfig::default();
        machine(&customers, &config).run(text)
    }

    const SCENARIO: &str = "Date: 01/06/2024\n\
        Invoice: INV-100\n\
        Ship to:\n\
        Asahi Beverages VIC\n\
        123 Example St\n\
        Material Number\n\
        5 MAT001 Widget 10.00 50.00\n";

    #[test]
    fn test_end_to_end_scenario() {
        let record = run(SCENARIO);

        assert_eq!(record.header.date.to_string(), "01/06/2024");
        assert_eq!(record.header.invoice_number, "INV-100");
        assert_eq!(
            record.header.bill_to.as_ref().unwrap().display_name,
            "Asahi Beverages VIC"
        );

        assert_eq!(record.items.len(), 1);
        let item = &record.items[0];
        assert_eq!(item.quantity, 5);
        assert_eq!(item.amount, Decimal::from_str("50.00").unwrap());
        assert_eq!(item.inc_tax_amount, item.amount);
        assert_eq!(item.description, "MAT001 - Widget x 5");
        assert_eq!(item.header.invoice_number, "INV-100");
        assert_eq!(item.header.customer_id, "ASAHI-VIC");
    }

    #[test]
    fn test_idempotence() {
        assert_eq!(run(SCENARIO), run(SCENARIO));
    }

    #[test]
    fn test_date_outside_period_moves_to_month_start() {
        let record = run("Date: 15/03/2099\n");
        assert_eq!(record.header.date.to_string(), "01/06/2024");
    }

    #[test]
    fn test_unparseable_date_kept_raw() {
        let record = run("Date: O1/O6/2O24\n");
        assert_eq!(
            record.header.date,
            InvoiceDate::Raw("O1/O6/2O24".to_string())
        );
    }

    #[test]
    fn test_duplicate_header_field_last_write_wins() {
        let record = run("Invoice: INV-1\nInvoice: INV-2\n");
        assert_eq!(record.header.invoice_number, "INV-2");
    }

    #[test]
    fn test_party_binding_order() {
        let text = "Asahi Beverages VIC\n\
            Frozen Sunshine\n\
            Rud Chains\n";
        let record = run(text);

        assert_eq!(
            record.header.bill_to.unwrap().display_name,
            "Asahi Beverages VIC"
        );
        // Second distinct mention is ship-to; the third never overwrites.
        assert_eq!(
            record.header.ship_to.unwrap().display_name,
            "Frozen Sunshine"
        );
    }

    #[test]
    fn test_both_parties_on_one_line() {
        // Some layouts run both names together on the line after "Ship to:".
        let text = "Ship to:\n\
            Asahi Beverages VIC Frozen Sunshine\n\
            123 Example St\n";
        let record = run(text);

        assert_eq!(
            record.header.bill_to.unwrap().display_name,
            "Asahi Beverages VIC"
        );
        assert_eq!(
            record.header.ship_to.unwrap().display_name,
            "Frozen Sunshine"
        );
        assert_eq!(record.header.ship_to_address, vec!["123 Example St"]);
    }

    #[test]
    fn test_repeated_name_counts_as_address_line() {
        // The recipient name often heads the delivery address; a mention
        // that binds nothing is still captured verbatim.
        let text = "Frozen Sunshine\n\
            Asahi Beverages VIC\n\
            Asahi Beverages VIC\n\
            123 Example St\n";
        let record = run(text);

        assert_eq!(
            record.header.ship_to_address,
            vec!["Asahi Beverages VIC", "123 Example St"]
        );
    }

    #[test]
    fn test_repeat_of_bill_to_does_not_bind_ship_to() {
        let text = "Asahi Beverages VIC\nAsahi Beverages VIC\n";
        let record = run(text);
        assert!(record.header.ship_to.is_none());
    }

    #[test]
    fn test_address_capture_stops_at_item_header() {
        let text = "Frozen Sunshine\n\
            Asahi Beverages VIC\n\
            123 Example St\n\
            \n\
            Suburb QLD 4000\n\
            QTY Material Number Description Unit Amount\n\
            Should not be an address line\n";
        let record = run(text);

        // Blank lines are skipped, the item header stops capture early.
        assert_eq!(
            record.header.ship_to_address,
            vec!["123 Example St", "Suburb QLD 4000"]
        );
    }

    #[test]
    fn test_address_capture_caps_at_three_lines() {
        let text = "Frozen Sunshine\n\
            Asahi Beverages VIC\n\
            Line A\nLine B\nLine C\nLine D\n";
        let record = run(text);
        assert_eq!(
            record.header.ship_to_address,
            vec!["Line A", "Line B", "Line C"]
        );
    }

    #[test]
    fn test_items_only_accepted_in_capture_region() {
        let text = "5 MAT001 Widget 10.00 50.00\n\
            Material Number\n\
            3 MAT002 Gasket 5.00 15.00\n";
        let record = run(text);

        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].description, "MAT002 - Gasket x 3");
    }

    #[test]
    fn test_continuation_folding() {
        let text = "Material Number\n\
            5 MAT001 Widget 10.00 50.00\n\
            with stainless fittings\n";
        let record = run(text);

        assert_eq!(record.items.len(), 1);
        assert_eq!(
            record.items[0].description,
            "MAT001 - Widget x 5 with stainless fittings"
        );
    }

    #[test]
    fn test_items_close_marker_ends_processing() {
        let text = "Material Number\n\
            5 MAT001 Widget 10.00 50.00\n\
            Direct deposit details: BSB 000-000\n\
            3 MAT002 Gasket 5.00 15.00\n\
            Invoice: LATE-1\n";
        let record = run(text);

        assert_eq!(record.items.len(), 1);
        // Lines after the close marker contribute nothing.
        assert_eq!(record.header.invoice_number, "");
    }

    #[test]
    fn test_missing_second_party_still_emits() {
        let text = "Invoice: INV-5\n\
            Asahi Beverages VIC\n\
            Material Number\n\
            2 MAT003 Shelf 20.00 40.00\n";
        let record = run(text);

        assert!(record.header.ship_to.is_none());
        assert!(record.header.ship_to_address.is_empty());
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].header.ship_to_lines, <[String; 4]>::default());
    }

    #[test]
    fn test_snapshot_frozen_at_append_time() {
        let text = "Invoice: INV-1\n\
            Material Number\n\
            5 MAT001 Widget 10.00 50.00\n\
            Invoice: INV-2\n\
            3 MAT002 Gasket 5.00 15.00\n";
        let record = run(text);

        // The header correction lands on the second item only.
        assert_eq!(record.items[0].header.invoice_number, "INV-1");
        assert_eq!(record.items[1].header.invoice_number, "INV-2");
        assert_eq!(record.header.invoice_number, "INV-2");
    }

    #[test]
    fn test_rejected_row_folds_into_previous_item() {
        let text = "Material Number\n\
            5 MAT001 Widget 10.00 50.00\n\
            2 spare clamps included no charge\n";
        let record = run(text);

        // Second line starts with a digit but has no numeric amount, so it
        // is folded, not captured and not dropped.
        assert_eq!(record.items.len(), 1);
        assert_eq!(
            record.items[0].description,
            "MAT001 - Widget x 5 2 spare clamps included no charge"
        );
    }

    #[test]
    fn test_unparseable_amount_on_candidate_folds() {
        let text = "Material Number\n\
            5 MAT001 Widget 10.00 50.00\n\
            3 MAT002 Gasket 5.00 5.0.0\n";
        let record = run(text);

        // The second row survives the digit check but fails decimal parsing;
        // it folds into the previous description instead of aborting.
        assert_eq!(record.items.len(), 1);
        assert_eq!(
            record.items[0].description,
            "MAT001 - Widget x 5 3 MAT002 Gasket 5.00 5.0.0"
        );
    }

    #[test]
    fn test_garbled_document_yields_default_record() {
        let record = run("complete OCR noise\nnothing recognizable here\n");
        assert_eq!(record, InvoiceRecord::default());
    }

    #[test]
    fn test_state_transitions() {
        let customers = CustomerDirectory::builtin();
        let config = ScaninvConfig::default();
        let mut m = machine(&customers, &config);
        let classifier = LineClassifier::new(&config.markers, &customers);

        assert_eq!(m.state(), ParseState::AwaitingHeader);
        m.step("Ship to:", classifier.classify("Ship to:", false));
        assert_eq!(m.state(), ParseState::AwaitingFirstParty);
        m.step(
            "Asahi Beverages VIC",
            classifier.classify("Asahi Beverages VIC", false),
        );
        assert_eq!(m.state(), ParseState::AwaitingSecondParty);
        m.step(
            "Material Number",
            classifier.classify("Material Number", false),
        );
        assert_eq!(m.state(), ParseState::CapturingItems);
        m.step(
            "Direct deposit details:",
            classifier.classify("Direct deposit details:", true),
        );
        assert_eq!(m.state(), ParseState::Done);
    }
}
