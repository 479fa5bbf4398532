//! Per-entity health reports and their renderers.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::completeness::CompletenessScorer;
use crate::domain::{QualityLevel, ScoreResult};
use crate::field_spec::FieldSpecTable;
use crate::freshness::{
    FreshnessInput, FreshnessReading, describe_age, map_freshness_descriptor,
    map_freshness_from_timestamp,
};
use crate::path::FieldPath;
use crate::presence::PresenceStrategy;
use crate::status::{StatusHints, StatusProgress, map_status_to_progress};
use crate::version::{DeliveredVersions, VersionHealthResult, compute_version_health};

/// Kind of catalog entity being assessed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A data model specification.
    #[default]
    Model,
    /// A data product listing.
    Product,
}

impl EntityKind {
    /// Lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Product => "product",
        }
    }

    /// Presence rule the catalog applies to this kind.
    pub fn default_presence(self) -> PresenceStrategy {
        match self {
            Self::Model => PresenceStrategy::Simple,
            Self::Product => PresenceStrategy::Typed,
        }
    }

    /// Built-in field specification table for this kind.
    pub fn spec(self) -> FieldSpecTable {
        match self {
            Self::Model => FieldSpecTable::data_model(),
            Self::Product => FieldSpecTable::data_product(),
        }
    }

    /// Built-in scorer for this kind.
    pub fn scorer(self) -> CompletenessScorer {
        CompletenessScorer::new(self.spec(), self.default_presence())
    }
}

/// Whether an entity could be loaded for assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Not assessed yet.
    Pending,
    /// Loaded and assessed.
    Loaded,
    /// Could not be loaded; see the report errors.
    Failed,
}

/// Health report for one catalog entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntityHealthReport {
    /// Where the entity came from (file path, request, ...).
    pub source: String,
    /// Entity `name`, when it has one.
    pub name: Option<String>,
    /// Entity kind.
    pub kind: EntityKind,
    /// Load status.
    pub load_status: LoadStatus,
    /// Metadata completeness.
    pub completeness: Option<ScoreResult>,
    /// Quality level of the completeness score.
    pub quality: Option<QualityLevel>,
    /// Version health, when both delivered and current versions are known.
    pub version_health: Option<VersionHealthResult>,
    /// Processing status reading.
    pub status: Option<StatusProgress>,
    /// Freshness reading.
    pub freshness: Option<FreshnessReading>,
    /// Relative age of `lastUpdated`, e.g. `"2 days ago"`.
    pub last_updated_label: Option<String>,
    /// Recoverable problems met while assessing.
    pub errors: Vec<String>,
}

impl EntityHealthReport {
    /// Create an empty report.
    pub fn new(source: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            source: source.into(),
            name: None,
            kind,
            load_status: LoadStatus::Pending,
            completeness: None,
            quality: None,
            version_health: None,
            status: None,
            freshness: None,
            last_updated_label: None,
            errors: Vec::new(),
        }
    }

    /// Create a report for an entity that could not be loaded.
    pub fn failed(source: impl Into<String>, kind: EntityKind, error: impl Into<String>) -> Self {
        let mut report = Self::new(source, kind);
        report.load_status = LoadStatus::Failed;
        report.errors.push(error.into());
        report
    }

    /// Display name: the entity name or its source.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.source)
    }
}

/// Builds [`EntityHealthReport`]s for a batch of entities of one kind.
#[derive(Debug, Clone)]
pub struct EntityAssessor {
    kind: EntityKind,
    scorer: CompletenessScorer,
    current_version: Option<String>,
    now: DateTime<Utc>,
}

impl EntityAssessor {
    /// Assessor using the built-in table and presence rule for `kind`.
    pub fn new(kind: EntityKind, now: DateTime<Utc>) -> Self {
        Self {
            kind,
            scorer: kind.scorer(),
            current_version: None,
            now,
        }
    }

    /// Kind of entity this assessor scores.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Replace the completeness scorer.
    pub fn with_scorer(mut self, scorer: CompletenessScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Compare delivered versions against this version instead of the
    /// entity's own `currentVersion`.
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = Some(version.into());
        self
    }

    /// Assess one entity.
    ///
    /// Delivered versions come from `deliveredVersions`, falling back to
    /// `version`. Freshness uses the delta strategy on `lastUpdated` when
    /// present, else the descriptor strategy on `freshness`.
    pub fn assess(&self, source: impl Into<String>, entity: &Value) -> EntityHealthReport {
        let mut report = EntityHealthReport::new(source, self.kind);
        if !entity.is_object() {
            report.load_status = LoadStatus::Failed;
            report.errors.push("entity is not a JSON object".to_string());
            return report;
        }
        report.load_status = LoadStatus::Loaded;
        report.name = FieldPath::from("name").lookup_str(entity).map(str::to_string);

        let completeness = self.scorer.score(entity);
        report.quality = Some(completeness.quality_level());
        report.completeness = Some(completeness);

        match self.version_health(entity) {
            Ok(health) => report.version_health = health,
            Err(err) => report
                .errors
                .push(format!("version health unavailable: {err}")),
        }

        if let Some(status) = FieldPath::from("status").lookup_str(entity) {
            let hints = StatusHints::from_entity(entity);
            report.status = Some(map_status_to_progress(status, &hints));
        }

        let last_updated = FieldPath::from("lastUpdated")
            .lookup(entity)
            .and_then(|value| serde_json::from_value::<FreshnessInput>(value.clone()).ok());
        if let Some(last_updated) = last_updated {
            report.freshness = Some(map_freshness_from_timestamp(&last_updated, self.now));
            report.last_updated_label = Some(describe_age(&last_updated, self.now));
        } else if let Some(descriptor) = FieldPath::from("freshness").lookup_str(entity) {
            report.freshness = Some(map_freshness_descriptor(descriptor));
        }

        report
    }

    fn version_health(&self, entity: &Value) -> crate::Result<Option<VersionHealthResult>> {
        let delivered = FieldPath::from("deliveredVersions")
            .lookup(entity)
            .or_else(|| FieldPath::from("version").lookup(entity))
            .and_then(|value| serde_json::from_value::<DeliveredVersions>(value.clone()).ok());
        let current = self
            .current_version
            .as_deref()
            .or_else(|| FieldPath::from("currentVersion").lookup_str(entity));
        match (delivered, current) {
            (Some(delivered), Some(current)) => compute_version_health(&delivered, current),
            _ => Ok(None),
        }
    }
}

/// Human readable explanation of a version health result.
pub fn explain_version_health(result: &VersionHealthResult) -> String {
    if !result.is_behind {
        return "Version is up to date!".to_string();
    }
    let details = result
        .per_version_detail
        .iter()
        .map(|detail| {
            format!(
                "v{} (Health: {}%, Major: -{}%, Minor: -{}%, Patch: -{}%)",
                detail.version,
                detail.health,
                detail.drops.major,
                detail.drops.minor,
                detail.drops.patch
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    let mut explanation = format!("Version health is {}% due to: {details}", result.health);
    if result.multi_version_penalty > 0 {
        let _ = write!(
            explanation,
            ", Additional {}% drop due to maintaining multiple versions",
            result.multi_version_penalty
        );
    }
    let _ = write!(
        explanation,
        ", Latest model version: v{}",
        result.current_version
    );
    explanation
}

/// Render reports as plain text, one block per entity.
pub fn render_report_text(reports: &[EntityHealthReport]) -> String {
    let mut output = String::new();
    for report in reports {
        let _ = writeln!(output, "{} ({})", report.title(), report.source);
        for (label, value) in summary_lines(report) {
            let _ = writeln!(output, "  {label}: {value}");
        }
        for error in &report.errors {
            let _ = writeln!(output, "  error: {error}");
        }
    }
    output
}

/// Render reports as Markdown.
pub fn render_report_markdown(reports: &[EntityHealthReport]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Catalog Health Report\n");
    for report in reports {
        let _ = writeln!(output, "## {}\n", report.title());
        let _ = writeln!(output, "- Source: `{}`", report.source);
        for (label, value) in summary_lines(report) {
            let _ = writeln!(output, "- {label}: {value}");
        }
        let _ = writeln!(output);
        append_missing_fields(&mut output, report.completeness.as_ref());
        append_list(
            &mut output,
            "Errors",
            &report.errors,
            "No errors reported.",
        );
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn summary_lines(report: &EntityHealthReport) -> Vec<(&'static str, String)> {
    let mut lines = vec![("Kind", report.kind.as_str().to_string())];
    if report.load_status == LoadStatus::Failed {
        lines.push(("Status", "failed to load".to_string()));
        return lines;
    }
    if let (Some(score), Some(quality)) = (&report.completeness, report.quality) {
        lines.push((
            "Completeness",
            format!("{}% ({})", score.score, quality.label()),
        ));
    }
    match &report.version_health {
        Some(health) => lines.push((
            "Version health",
            format!("{}% ({})", health.health, explain_version_health(health)),
        )),
        None => lines.push(("Version health", "unavailable".to_string())),
    }
    if let Some(status) = &report.status {
        lines.push(("Status", format!("{} ({}%)", status.label, status.percent)));
    }
    if let Some(freshness) = &report.freshness {
        let age = report
            .last_updated_label
            .as_deref()
            .map(|label| format!(", updated {label}"))
            .unwrap_or_default();
        lines.push(("Freshness", format!("{}%{age}", freshness.percent)));
    }
    lines
}

fn append_missing_fields(output: &mut String, completeness: Option<&ScoreResult>) {
    let Some(completeness) = completeness else {
        return;
    };
    append_list(
        output,
        "Missing fields",
        &completeness.missing_fields,
        "All fields present.",
    );
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}
