//! Rule-based building blocks for financial statement extraction.

pub mod amounts;
pub mod classifier;
pub mod confidence;
pub mod matcher;
pub mod patterns;
pub mod vocabulary;

pub use amounts::{normalize_amount, strip_grouping, unit_multiplier, AmountNotation, CRORE};
pub use classifier::{classify_document, DocumentScores};
pub use confidence::score_confidence;
pub use matcher::{extract_fields, split_lines, FieldMatcher, RawLine, DEFAULT_LOOKAHEAD};
pub use vocabulary::{FieldAliases, Vocabulary};
