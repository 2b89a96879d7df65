//! Known-customer directory: display names and their ledger identifiers.
//!
//! The directory is built once at startup and injected where needed; tests
//! substitute a small fixture via [`CustomerDirectory::from_pairs`].

use serde::{Deserialize, Serialize};

/// A known customer: display name plus ledger identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Display name as it appears on invoices.
    pub display_name: String,

    /// Internal ledger identifier. May be empty for customers without one.
    pub customer_id: String,
}

impl CustomerRecord {
    pub fn new(display_name: impl Into<String>, customer_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            customer_id: customer_id.into(),
        }
    }
}

/// Immutable lookup over the known-customer list.
///
/// Mention matching is substring containment, not equality: OCR lines often
/// carry leading/trailing noise around the customer name. Insertion order
/// decides ties, matching the production list order.
#[derive(Debug, Clone)]
pub struct CustomerDirectory {
    entries: Vec<CustomerRecord>,
}

/// Production customer list. An empty identifier means the customer has no
/// ledger card yet.
const BUILTIN_CUSTOMERS: &[(&str, &str)] = &[
    ("Asahi Lifestyle Beverages", "ASAHI"),
    ("Asahi Beverages NSW", "ASAHINSW"),
    ("Asahi Beverages QLD - Heathwood", "ASAHIQ-HW"),
    ("Asahi Beverages QLD - Trailways", "ASAHIQLD-TRL"),
    ("Asahi Beverages SA", "ASAHISA"),
    ("Asahi Beverages SA - AB Service", "ASAHISA-AB"),
    ("Asahi Beverages SA - Bulk", "ASAHISA-BLK"),
    ("Asahi Beverages TAS - Invermay", "ASAHITAS-I"),
    ("Asahi Beverages TAS - New Town", "ASAHITAS-NT"),
    ("Asahi Beverages VIC", "ASAHI-VIC"),
    ("Asahi Beverages VIC - Bulk", "ASAHIVIC-BLK"),
    ("Asahi Beverages WA", "ASAHIWA"),
    ("Asahi Beverages WA - Bulk", "ASAHIWA-BLK"),
    ("ATLANTA REFRIGERATION SA", "ATLANTAFRDG"),
    ("BENDESIGNS NT", "BENDESIGNS"),
    ("Frozen Sunshine", "FROZENSUNSHINE"),
    ("Hoshizaki Lancer", "HOSHIZAKIL"),
    ("JJR Engineering Pty Ltd", "JJRENGINEERING"),
    ("KINGLOC NSW", "KINGLOCNSW"),
    ("Kingloc QLD", "KINGLOCQLD"),
    ("Kingloc TAS/RBR Refrigeration", "KINGLOCTAS-R"),
    ("KINGLOC VIC", "KINGLOC-VIC"),
    ("PFM LOGISTICS VIC", "PFM-VIC-LGT"),
    ("PFM NT", "PFM-NT"),
    ("PFM SA", "PFM-SA"),
    ("Rud Chains", "RUDCHAINS"),
    ("Wrapt Freight NSW", "WRPTFREIGHT"),
    ("KINGLOC WA", "KINGLOCWA"),
    ("ZONCA REFRIGERATION", "ZONCAFRIDGE"),
    ("PICCOLO ME HORSLEY PARK", "PICCOLOMHP"),
    ("TCN VENDING AUSTRALIA", "TCNVENDAUS"),
];

impl CustomerDirectory {
    /// Build the compiled-in production directory.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_CUSTOMERS.iter().copied())
    }

    /// Build a directory from `(display_name, customer_id)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(name, id)| CustomerRecord::new(name, id))
                .collect(),
        }
    }

    /// Look up the ledger identifier for an exact display name.
    pub fn lookup(&self, display_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|c| c.display_name == display_name)
            .map(|c| c.customer_id.as_str())
    }

    /// Find the first known customer whose display name occurs anywhere
    /// inside the line. Case-sensitive, exact punctuation.
    pub fn find_mention(&self, line: &str) -> Option<&CustomerRecord> {
        self.entries.iter().find(|c| line.contains(&c.display_name))
    }

    /// Number of known customers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
