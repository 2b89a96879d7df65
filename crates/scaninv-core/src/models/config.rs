//! Configuration structures for the extraction pipeline.
//!
//! Defaults reproduce the production layouts exactly, so a run with no config
//! file behaves identically to the compiled-in behavior.

use serde::{Deserialize, Serialize};

/// Main configuration for the scaninv pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaninvConfig {
    /// Line-classification marker strings.
    pub markers: MarkerConfig,

    /// Per-customer-template tuning knobs.
    pub template: TemplateConfig,

    /// Fixed values written into every output row.
    pub output: OutputConfig,
}

/// Literal substrings that classify lines. All matching is case-sensitive
/// substring containment over the raw OCR line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Header field marker for the invoice date.
    pub date: String,

    /// Header field marker for the invoice number.
    pub invoice: String,

    /// Header field marker for the customer purchase order.
    pub purchase_order: String,

    /// Section markers that open a party-designation region.
    pub party: Vec<String>,

    /// Section markers that open the item-capture region. Includes the
    /// common OCR misreading of "Number" as "Nurnber".
    pub items_open: Vec<String>,

    /// Section marker that closes the item-capture region.
    pub items_close: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            date: "Date:".to_string(),
            invoice: "Invoice:".to_string(),
            purchase_order: "Purchase Order:".to_string(),
            party: vec!["Invoice to:".to_string(), "Ship to:".to_string()],
            items_open: vec![
                "Material Number".to_string(),
                "Material Nurnber".to_string(),
            ],
            items_close: "Direct deposit details:".to_string(),
        }
    }
}

/// Tuning knobs that historically varied per customer template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Minimum token count for an item row to carry a material-number
    /// column. Shorter rows treat the second token as description.
    pub material_number_min_tokens: usize,

    /// Maximum number of ship-to address lines captured after the second
    /// party mention.
    pub address_line_limit: usize,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            material_number_min_tokens: 4,
            address_line_limit: 3,
        }
    }
}

/// Fixed ledger values stamped onto every output row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// General-ledger account number.
    pub account_number: u32,

    /// Job category.
    pub category: String,

    /// Tax code.
    pub tax_code: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            account_number: 43000,
            category: "Yeronga".to_string(),
            tax_code: "GST".to_string(),
        }
    }
}

impl ScaninvConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_markers_match_production_layouts() {
        let markers = MarkerConfig::default();
        assert_eq!(markers.date, "Date:");
        assert!(markers.items_open.contains(&"Material Nurnber".to_string()));
        assert_eq!(markers.items_close, "Direct deposit details:");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ScaninvConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: ScaninvConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.output.account_number, 43000);
        assert_eq!(back.template.material_number_min_tokens, 4);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ScaninvConfig =
            serde_json::from_str(r#"{"output": {"category": "Brisbane"}}"#).unwrap();
        assert_eq!(config.output.category, "Brisbane");
        assert_eq!(config.output.tax_code, "GST");
        assert_eq!(config.markers.date, "Date:");
    }
}
