//! OpenAPI specification for the catalog health server.

use utoipa::OpenApi;

use catalog_health_core::{
    ColorKey, EntityHealthReport, EntityKind, FreshnessMode, FreshnessReading, FreshnessTier,
    LoadStatus, PipelineRollup, PresenceStrategy, QualityLevel, ScoreResult, StatusBucket,
    StatusHints, StatusProgress, UsageLevel, VersionDetail, VersionDrift, VersionDrops,
    VersionHealthResult, VersionTriple,
};

use crate::routes::{
    CompletenessRequest, CompletenessResponse, ErrorResponse, FreshnessRequest, FreshnessResponse,
    ReportRequest, RollupRequest, RollupResponse, StatusRequest, UsageRequest, UsageResponse,
    VersionHealthRequest, VersionHealthResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::score_completeness,
        crate::routes::score_version_health,
        crate::routes::status_progress,
        crate::routes::status_rollup,
        crate::routes::freshness,
        crate::routes::usage,
        crate::routes::entity_report,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            CompletenessRequest,
            CompletenessResponse,
            VersionHealthRequest,
            VersionHealthResponse,
            StatusRequest,
            RollupRequest,
            RollupResponse,
            FreshnessRequest,
            FreshnessResponse,
            UsageRequest,
            UsageResponse,
            ReportRequest,
            ErrorResponse,
            ColorKey,
            EntityHealthReport,
            EntityKind,
            FreshnessMode,
            FreshnessReading,
            FreshnessTier,
            LoadStatus,
            PipelineRollup,
            PresenceStrategy,
            QualityLevel,
            ScoreResult,
            StatusBucket,
            StatusHints,
            StatusProgress,
            UsageLevel,
            VersionDetail,
            VersionDrift,
            VersionDrops,
            VersionHealthResult,
            VersionTriple
        )
    ),
    tags(
        (name = "score", description = "Completeness and version health scoring"),
        (name = "status", description = "Status progress"),
        (name = "freshness", description = "Freshness scoring"),
        (name = "usage", description = "Usage aggregation"),
        (name = "report", description = "Combined entity reports"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the catalog health server.
pub struct ApiDoc;
