//! Core library for scanned-invoice extraction.
//!
//! This crate provides:
//! - A known-customer directory with ledger identifiers
//! - Line classification over OCR-produced invoice text
//! - A state-machine fold that turns the line stream into a structured record
//! - Item-row parsing with numeric validation
//! - Flattening of records into fixed-order ledger import rows

pub mod assemble;
pub mod customers;
pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;

pub use assemble::{assemble_rows, COLUMNS};
pub use customers::{CustomerDirectory, CustomerRecord};
pub use error::{ItemReject, PdfError, Result, ScaninvError};
pub use extract::{extract_record, ExtractionStateMachine, LineClassifier, ParseState};
pub use models::config::ScaninvConfig;
pub use models::invoice::{InvoiceHeader, InvoiceRecord, LineItem};
