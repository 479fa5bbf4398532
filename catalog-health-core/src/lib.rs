#![deny(missing_docs)]
//! Catalog health core library.
//!
//! Pure scoring functions for catalog entities: weighted metadata
//! completeness, version drift health, status progress and freshness. The
//! crate performs no I/O; callers hand in already-fetched JSON entities.

pub mod clock;
pub mod completeness;
pub mod domain;
pub mod error;
pub mod field_spec;
pub mod freshness;
pub mod path;
pub mod presence;
pub mod report;
pub mod stats;
pub mod status;
pub mod version;

pub use clock::{Clock, FixedClock, SystemClock};
pub use completeness::{CompletenessScorer, compute_completeness_score};
pub use domain::{ColorKey, QualityLevel, ScoreResult};
pub use error::{CatalogHealthError, Result};
pub use field_spec::{FieldSpec, FieldSpecEntry, FieldSpecTable, FieldSpecTableBuilder, Requirement};
pub use freshness::{
    FreshnessInput, FreshnessMode, FreshnessReading, FreshnessTier, describe_age, map_freshness,
    map_freshness_descriptor, map_freshness_from_datetime, map_freshness_from_timestamp,
    parse_timestamp,
};
pub use path::FieldPath;
pub use presence::PresenceStrategy;
pub use report::{
    EntityAssessor, EntityHealthReport, EntityKind, LoadStatus, explain_version_health,
    render_json, render_report_markdown, render_report_text,
};
pub use stats::{UsageLevel, average, average_or_default, usage_level};
pub use status::{
    PipelineRollup, StatusBucket, StatusHints, StatusProgress, map_status_to_progress,
    rollup_pipeline_status,
};
pub use version::{
    DeliveredVersions, VersionDetail, VersionDrift, VersionDrops, VersionHealthResult,
    VersionTriple, compute_version_health, parse_version,
};
