//! Line-oriented field extraction: classifier, state machine, item parser.

pub mod classifier;
pub mod items;
pub mod machine;

pub use classifier::{HeaderFieldKind, LineClassifier, LineKind, SectionKind};
pub use items::{parse_item_line, ParsedRow};
pub use machine::{extract_record, ExtractionStateMachine, ParseState};
