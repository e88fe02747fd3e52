//! Extracted field mappings and the store that resolves conflicts between them.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::field::FieldKey;
use super::financials::FinancialInputs;
use crate::error::ExtractionError;

/// Review band for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    /// `high` from 0.8, `medium` from 0.6, `low` below.
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// One extracted line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Line item this value belongs to.
    pub field: FieldKey,
    /// Value in crores.
    pub value: Decimal,
    /// Text of the line the keyword matched on.
    pub original_text: String,
    /// Position of the keyword line among the non-empty lines.
    pub line_index: usize,
    /// Position of the line the number was read from.
    pub value_line_index: usize,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Display name of the field.
    pub field_name: String,
}

impl FieldMapping {
    /// Review band of this mapping.
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }

    /// Whether the number was found on a line after the keyword.
    pub fn from_lookahead(&self) -> bool {
        self.value_line_index != self.line_index
    }
}

/// Extracted fields keyed by line item, at most one mapping per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMappings {
    entries: BTreeMap<FieldKey, FieldMapping>,
}

impl FieldMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate mapping.
    ///
    /// The candidate is stored when its field has no mapping yet or when it
    /// is strictly more confident than the current one. Returns whether the
    /// store changed.
    pub fn offer(&mut self, candidate: FieldMapping) -> bool {
        match self.entries.get(&candidate.field) {
            Some(existing) if candidate.confidence <= existing.confidence => {
                trace!(
                    "Kept {} at {:.2} over candidate at {:.2}",
                    candidate.field, existing.confidence, candidate.confidence
                );
                false
            }
            _ => {
                self.entries.insert(candidate.field, candidate);
                true
            }
        }
    }

    /// Mapping for a field.
    pub fn get(&self, field: FieldKey) -> Option<&FieldMapping> {
        self.entries.get(&field)
    }

    /// Mappings in field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every mapping.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Overwrite a field's value with a user correction.
    ///
    /// Confidence and source text are left as extracted.
    pub fn set_value(&mut self, field: FieldKey, value: Decimal) -> Result<(), ExtractionError> {
        let mapping = self
            .entries
            .get_mut(&field)
            .ok_or_else(|| ExtractionError::MissingField(field.to_string()))?;
        mapping.value = value;
        Ok(())
    }

    /// Form values for every mapping, formatted to two decimal places.
    pub fn form_values(&self) -> BTreeMap<FieldKey, String> {
        self.entries
            .iter()
            .map(|(field, mapping)| (*field, format!("{:.2}", to_cents(mapping.value))))
            .collect()
    }

    /// Copy every value, rounded to two decimals, into the input form.
    pub fn apply_to(&self, inputs: &mut FinancialInputs) -> usize {
        for (field, mapping) in &self.entries {
            inputs.set(*field, to_cents(mapping.value));
        }
        self.entries.len()
    }
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
