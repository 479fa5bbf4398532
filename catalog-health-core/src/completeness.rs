//! Weighted metadata completeness scoring.

use log::debug;
use serde_json::Value;

use crate::domain::ScoreResult;
use crate::field_spec::FieldSpecTable;
use crate::presence::PresenceStrategy;

/// Score how complete `entity` is against `spec`.
///
/// Every field with a positive weight contributes to the total. Nested group
/// fields are read from `entity[group][field]`. Absent or malformed values are
/// counted as missing; this function never fails.
pub fn compute_completeness_score(
    entity: &Value,
    spec: &FieldSpecTable,
    presence: PresenceStrategy,
) -> ScoreResult {
    let mut total_weight = 0.0;
    let mut filled_weight = 0.0;
    let mut filled_fields = Vec::new();
    let mut missing_fields = Vec::new();

    for (path, field) in spec.fields() {
        if field.weight <= 0.0 {
            continue;
        }
        total_weight += field.weight;
        if presence.has_value(path.lookup(entity)) {
            filled_weight += field.weight;
            filled_fields.push(path.to_string());
        } else {
            missing_fields.push(path.to_string());
        }
    }

    let score = weighted_percent(filled_weight, total_weight);
    debug!(
        "completeness {score}% ({filled_weight}/{total_weight}), {} missing",
        missing_fields.len()
    );

    ScoreResult {
        score,
        filled_fields,
        missing_fields,
        total_weight,
        filled_weight,
    }
}

fn weighted_percent(filled: f64, total: f64) -> u8 {
    if total <= 0.0 {
        return 0;
    }
    ((filled / total) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// A spec table paired with the presence rule its callers agreed on.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletenessScorer {
    spec: FieldSpecTable,
    presence: PresenceStrategy,
}

impl CompletenessScorer {
    /// Create a scorer.
    pub fn new(spec: FieldSpecTable, presence: PresenceStrategy) -> Self {
        Self { spec, presence }
    }

    /// Scorer for data model specifications (simple presence rule).
    pub fn data_model() -> Self {
        Self::new(FieldSpecTable::data_model(), PresenceStrategy::Simple)
    }

    /// Scorer for data product listings (type-aware presence rule).
    pub fn data_product() -> Self {
        Self::new(FieldSpecTable::data_product(), PresenceStrategy::Typed)
    }

    /// The table this scorer uses.
    pub fn spec(&self) -> &FieldSpecTable {
        &self.spec
    }

    /// The presence rule this scorer uses.
    pub fn presence(&self) -> PresenceStrategy {
        self.presence
    }

    /// Score an entity.
    pub fn score(&self, entity: &Value) -> ScoreResult {
        compute_completeness_score(entity, &self.spec, self.presence)
    }
}
