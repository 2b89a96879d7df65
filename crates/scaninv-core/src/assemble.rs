//! Flattening of finished records into tabular output rows.
//!
//! Column order is fixed by the downstream ledger import and must not change.

use rust_decimal::Decimal;

use crate::models::config::OutputConfig;
use crate::models::invoice::InvoiceRecord;

/// Fixed output column order.
pub const COLUMNS: [&str; 16] = [
    "Description",
    "Amount",
    "Inc-Tax Amount",
    "Date",
    "Invoice #",
    "Customer PO",
    "Co./Last Name",
    "Card ID",
    "Addr 1 - Line 1",
    "- Line 2",
    "- Line 3",
    "- Line 4",
    "Account #",
    "Category",
    "Job",
    "Tax Code",
];

/// One output row per line item, denormalized from the item's header
/// snapshot. `decimal_places` of `None` leaves amounts as parsed; the
/// tab-separated writer passes `Some(2)`.
pub fn assemble_rows(
    record: &InvoiceRecord,
    output: &OutputConfig,
    decimal_places: Option<u32>,
) -> Vec<[String; 16]> {
    record
        .items
        .iter()
        .map(|item| {
            let h = &item.header;
            [
                item.description.clone(),
                format_amount(item.amount, decimal_places),
                format_amount(item.inc_tax_amount, decimal_places),
                h.date.clone(),
                h.invoice_number.clone(),
                h.purchase_order.clone(),
                h.bill_to_name.clone(),
                h.customer_id.clone(),
                h.ship_to_lines[0].clone(),
                h.ship_to_lines[1].clone(),
                h.ship_to_lines[2].clone(),
                h.ship_to_lines[3].clone(),
                output.account_number.to_string(),
                output.category.clone(),
                // Job mirrors the invoice number.
                h.invoice_number.clone(),
                output.tax_code.clone(),
            ]
        })
        .collect()
}

fn format_amount(amount: Decimal, decimal_places: Option<u32>) -> String {
    match decimal_places {
        Some(dp) => format!("{:.*}", dp as usize, amount),
        None => amount.to_string(),
    }
}
