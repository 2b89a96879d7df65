//! Data models for extracted invoice records and pipeline configuration.

pub mod config;
pub mod invoice;

pub use config::{MarkerConfig, OutputConfig, ScaninvConfig, TemplateConfig};
pub use invoice::{HeaderSnapshot, InvoiceDate, InvoiceHeader, InvoiceRecord, LineItem};
