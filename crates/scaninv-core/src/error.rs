//! Error types for the scaninv-core library.

use thiserror::Error;

/// Main error type for the scaninv library.
#[derive(Error, Debug)]
pub enum ScaninvError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The PDF carries no embedded text (scanned image only).
    #[error("PDF has no embedded text; run it through OCR first")]
    NoEmbeddedText,
}

/// Reasons an item-capture row is rejected by the item-line parser.
///
/// Rejection is never fatal: the state machine folds the rejected line into
/// the previous item's description instead of dropping it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemReject {
    /// Fewer than two whitespace tokens on the line.
    #[error("too few tokens: {0}")]
    TooFewTokens(usize),

    /// The first token is not an all-digit quantity.
    #[error("non-numeric quantity: {0:?}")]
    NonNumericQuantity(String),

    /// The last token is not numeric after stripping commas and `$`.
    #[error("non-numeric amount: {0:?}")]
    NonNumericAmount(String),

    /// The amount token passed the digit check but failed decimal parsing.
    #[error("unparseable amount: {0:?}")]
    UnparseableAmount(String),
}

/// Result type for the scaninv library.
pub type Result<T> = std::result::Result<T, ScaninvError>;
