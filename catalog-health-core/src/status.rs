//! Status string to progress-bar mapping for datasets and pipelines.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ColorKey;
use crate::path::FieldPath;

/// Normalised processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusBucket {
    /// `done` or `complete`.
    Done,
    /// `running`.
    Running,
    /// `failed` or `error`.
    Failed,
    /// `in queue`, `in_queue` or `queue`.
    InQueue,
    /// `backlog`.
    Backlog,
    /// Anything else, including an empty status.
    Unknown,
}

impl StatusBucket {
    /// Classify a raw status string, ignoring case and surrounding whitespace.
    pub fn parse(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "done" | "complete" => Self::Done,
            "running" => Self::Running,
            "failed" | "error" => Self::Failed,
            "in queue" | "in_queue" | "queue" => Self::InQueue,
            "backlog" => Self::Backlog,
            _ => Self::Unknown,
        }
    }

    /// Color bucket for the status.
    pub fn color(self) -> ColorKey {
        match self {
            Self::Done => ColorKey::Green,
            Self::Running => ColorKey::Orange,
            Self::Failed => ColorKey::Red,
            Self::InQueue | Self::Backlog => ColorKey::Blue,
            Self::Unknown => ColorKey::Gray,
        }
    }
}

/// Optional hints refining the percentage of running and failed statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHints {
    /// Explicit percentage reached before a failure.
    #[serde(default)]
    pub failure_percentage: Option<f64>,
    /// Index of the step currently executing; zero is treated as unset.
    #[serde(default)]
    pub current_step: Option<f64>,
    /// The process steps; only their count matters.
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub process_steps: Option<Vec<Value>>,
    /// Free-form progress percentage reported by the pipeline.
    #[serde(default)]
    pub progress: Option<f64>,
}

impl StatusHints {
    /// Read hints from an entity's `failurePercentage`, `currentStep`,
    /// `processSteps` and `progress` fields. Values of the wrong shape are
    /// ignored.
    pub fn from_entity(entity: &Value) -> Self {
        Self {
            failure_percentage: FieldPath::from("failurePercentage").lookup_f64(entity),
            current_step: FieldPath::from("currentStep").lookup_f64(entity),
            process_steps: FieldPath::from("processSteps")
                .lookup(entity)
                .and_then(Value::as_array)
                .cloned(),
            progress: FieldPath::from("progress").lookup_f64(entity),
        }
    }

    /// Hints carrying only a step position out of `steps` total.
    pub fn with_steps(current_step: f64, steps: usize) -> Self {
        Self {
            current_step: Some(current_step),
            process_steps: Some(vec![Value::Null; steps]),
            ..Self::default()
        }
    }

    /// `current_step / len(process_steps) * 100`, when both are usable.
    fn step_percent(&self) -> Option<f64> {
        let step = self.current_step.filter(|step| *step != 0.0 && step.is_finite())?;
        let steps = self.process_steps.as_ref().filter(|steps| !steps.is_empty())?;
        Some(step / steps.len() as f64 * 100.0)
    }
}

/// Display percentage, color and label for a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusProgress {
    /// Progress-bar fill, 0-100.
    pub percent: u8,
    /// Color bucket.
    pub color_key: ColorKey,
    /// Human readable status label.
    pub label: String,
    /// Normalised status.
    pub bucket: StatusBucket,
}

/// Percentage applied to running statuses without step or progress hints.
pub const DEFAULT_RUNNING_PERCENT: f64 = 75.0;
/// Percentage applied to failed statuses without any hint.
pub const DEFAULT_FAILED_PERCENT: f64 = 50.0;

/// Map a status string and optional hints to a progress reading.
pub fn map_status_to_progress(status: &str, hints: &StatusHints) -> StatusProgress {
    let bucket = StatusBucket::parse(status);
    let percent = match bucket {
        StatusBucket::Done => 100.0,
        StatusBucket::Running => match hints.step_percent() {
            Some(percent) => percent.min(99.0),
            None => hints.progress.unwrap_or(DEFAULT_RUNNING_PERCENT),
        },
        StatusBucket::Failed => match (hints.failure_percentage, hints.step_percent()) {
            (Some(percent), _) => percent,
            (None, Some(percent)) => percent.clamp(10.0, 90.0),
            (None, None) => hints.progress.unwrap_or(DEFAULT_FAILED_PERCENT),
        },
        StatusBucket::InQueue => 50.0,
        StatusBucket::Backlog => 25.0,
        StatusBucket::Unknown => 0.0,
    };

    StatusProgress {
        percent: to_percent(percent),
        color_key: bucket.color(),
        label: status_label(status, bucket),
        bucket,
    }
}

fn to_percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Queue and unknown statuses get fixed labels; the rest capitalize the raw
/// status, surrounding whitespace included.
fn status_label(status: &str, bucket: StatusBucket) -> String {
    match bucket {
        StatusBucket::InQueue => "In Queue".to_string(),
        StatusBucket::Unknown => "Unknown".to_string(),
        _ => {
            let mut chars = status.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Rolled-up status of a pipeline made of several datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PipelineRollup {
    /// At least one dataset is running.
    Running,
    /// Nothing is running and at least one dataset failed.
    Failed,
    /// Every dataset is done.
    Complete,
    /// Empty, or a mix of waiting and finished datasets.
    Pending,
}

/// Roll the statuses of a pipeline's datasets up into one status.
///
/// Running wins over failed, which wins over complete.
pub fn rollup_pipeline_status<I, S>(statuses: I) -> PipelineRollup
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let buckets: Vec<StatusBucket> = statuses
        .into_iter()
        .map(|status| StatusBucket::parse(status.as_ref()))
        .collect();
    if buckets.is_empty() {
        PipelineRollup::Pending
    } else if buckets.contains(&StatusBucket::Running) {
        PipelineRollup::Running
    } else if buckets.contains(&StatusBucket::Failed) {
        PipelineRollup::Failed
    } else if buckets.iter().all(|bucket| *bucket == StatusBucket::Done) {
        PipelineRollup::Complete
    } else {
        PipelineRollup::Pending
    }
}
