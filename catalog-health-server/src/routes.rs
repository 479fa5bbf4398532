//! HTTP handlers for the catalog health server.

use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use catalog_health_core::{
    CatalogHealthError, Clock, CompletenessScorer, DeliveredVersions, EntityAssessor, EntityKind,
    FieldSpecTable, FreshnessInput, FreshnessMode, FreshnessReading, PipelineRollup,
    PresenceStrategy, QualityLevel, ScoreResult, StatusHints, UsageLevel, VersionHealthResult,
    average, compute_version_health, describe_age, explain_version_health, map_freshness,
    map_status_to_progress, rollup_pipeline_status,
};

use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Field table used for data models.
    pub model_spec: FieldSpecTable,
    /// Field table used for data products.
    pub product_spec: FieldSpecTable,
    /// Time source for delta freshness.
    pub clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    /// Create state from configured tables and a clock.
    pub fn new(
        model_spec: FieldSpecTable,
        product_spec: FieldSpecTable,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            model_spec,
            product_spec,
            clock,
        }
    }

    fn spec_for(&self, kind: EntityKind) -> &FieldSpecTable {
        match kind {
            EntityKind::Model => &self.model_spec,
            EntityKind::Product => &self.product_spec,
        }
    }
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn bad_request(error: CatalogHealthError) -> HttpResponse {
    warn!("rejecting request: {error}");
    HttpResponse::BadRequest().json(ErrorResponse {
        message: error.to_string(),
    })
}

/// Request payload for completeness scoring.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessRequest {
    /// Entity to score.
    #[schema(value_type = Object)]
    pub entity: Value,
    /// Entity kind; selects the configured table and default presence rule.
    #[serde(default)]
    pub kind: EntityKind,
    /// Field specification table overriding the configured one.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub spec: Option<Value>,
    /// Presence rule overriding the kind's default.
    #[serde(default)]
    pub presence: Option<PresenceStrategy>,
}

/// Completeness score with its quality level.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletenessResponse {
    /// Score details.
    pub result: ScoreResult,
    /// Quality level of the score.
    pub quality: QualityLevel,
    /// Display label of the quality level.
    pub quality_label: String,
}

/// Request payload for version health.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionHealthRequest {
    /// Delivered versions; a single string is also accepted.
    #[schema(value_type = Vec<String>)]
    pub delivered: DeliveredVersions,
    /// Current model version.
    pub current: String,
}

/// Version health result with a readable explanation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionHealthResponse {
    /// Health result; null when either side is missing.
    pub result: Option<VersionHealthResult>,
    /// Explanation of the drops behind the health value.
    pub explanation: Option<String>,
}

/// Request payload for status progress.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    /// Raw status string.
    pub status: String,
    /// Optional step and progress hints.
    #[serde(default)]
    pub hints: StatusHints,
}

/// Request payload for a pipeline status rollup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RollupRequest {
    /// Statuses of the pipeline's datasets.
    pub statuses: Vec<String>,
}

/// Rolled-up pipeline status.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RollupResponse {
    /// Pipeline status.
    pub status: PipelineRollup,
}

/// Request payload for freshness scoring.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessRequest {
    /// Descriptor, timestamp string or epoch milliseconds.
    #[schema(value_type = String)]
    pub input: FreshnessInput,
    /// Strategy to apply.
    pub mode: FreshnessMode,
}

/// Freshness reading, with a relative age label for deltas.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FreshnessResponse {
    /// Reading.
    pub reading: FreshnessReading,
    /// Relative age such as "2 days ago"; delta mode only.
    pub age: Option<String>,
}

/// Request payload for usage aggregation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageRequest {
    /// Usage series.
    pub values: Vec<f64>,
}

/// Average usage and its level.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    /// Mean of the series; 0 for an empty series.
    pub average: f64,
    /// Usage level of the mean.
    pub level: UsageLevel,
}

/// Request payload for a full entity report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    /// Entity to assess.
    #[schema(value_type = Object)]
    pub entity: Value,
    /// Entity kind.
    #[serde(default)]
    pub kind: EntityKind,
    /// Version to compare delivered versions against.
    #[serde(default)]
    pub current_version: Option<String>,
    /// Label for the entity source; defaults to "request".
    #[serde(default)]
    pub source: Option<String>,
}

#[utoipa::path(
    post,
    path = "/score/completeness",
    request_body = CompletenessRequest,
    responses(
        (status = 200, description = "Completeness score", body = CompletenessResponse),
        (status = 400, description = "Invalid field specification", body = ErrorResponse)
    ),
    tag = "score"
)]
#[post("/api/score/completeness")]
/// Score the metadata completeness of an entity.
pub async fn score_completeness(
    state: web::Data<AppState>,
    payload: web::Json<CompletenessRequest>,
) -> impl Responder {
    let payload = payload.into_inner();
    let spec = match payload.spec {
        Some(spec) => match FieldSpecTable::from_json_value(spec) {
            Ok(spec) => spec,
            Err(err) => return bad_request(err),
        },
        None => state.spec_for(payload.kind).clone(),
    };
    let presence = payload
        .presence
        .unwrap_or_else(|| payload.kind.default_presence());
    let result = CompletenessScorer::new(spec, presence).score(&payload.entity);
    let quality = result.quality_level();
    HttpResponse::Ok().json(CompletenessResponse {
        result,
        quality,
        quality_label: quality.label().to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/score/version-health",
    request_body = VersionHealthRequest,
    responses(
        (status = 200, description = "Version health", body = VersionHealthResponse),
        (status = 400, description = "Malformed version string", body = ErrorResponse)
    ),
    tag = "score"
)]
#[post("/api/score/version-health")]
/// Compute version health of delivered versions against the current version.
pub async fn score_version_health(payload: web::Json<VersionHealthRequest>) -> impl Responder {
    match compute_version_health(&payload.delivered, &payload.current) {
        Ok(result) => HttpResponse::Ok().json(VersionHealthResponse {
            explanation: result.as_ref().map(explain_version_health),
            result,
        }),
        Err(err) => bad_request(err),
    }
}

#[utoipa::path(
    post,
    path = "/status/progress",
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status progress", body = catalog_health_core::StatusProgress)
    ),
    tag = "status"
)]
#[post("/api/status/progress")]
/// Map a status string and hints to a progress reading.
pub async fn status_progress(payload: web::Json<StatusRequest>) -> impl Responder {
    HttpResponse::Ok().json(map_status_to_progress(&payload.status, &payload.hints))
}

#[utoipa::path(
    post,
    path = "/status/rollup",
    request_body = RollupRequest,
    responses(
        (status = 200, description = "Pipeline status", body = RollupResponse)
    ),
    tag = "status"
)]
#[post("/api/status/rollup")]
/// Roll dataset statuses up into one pipeline status.
pub async fn status_rollup(payload: web::Json<RollupRequest>) -> impl Responder {
    HttpResponse::Ok().json(RollupResponse {
        status: rollup_pipeline_status(&payload.statuses),
    })
}

#[utoipa::path(
    post,
    path = "/freshness",
    request_body = FreshnessRequest,
    responses(
        (status = 200, description = "Freshness reading", body = FreshnessResponse)
    ),
    tag = "freshness"
)]
#[post("/api/freshness")]
/// Score freshness with the requested strategy.
pub async fn freshness(
    state: web::Data<AppState>,
    payload: web::Json<FreshnessRequest>,
) -> impl Responder {
    let clock = state.clock.as_ref();
    let reading = map_freshness(&payload.input, payload.mode, clock);
    let age = match payload.mode {
        FreshnessMode::Delta => Some(describe_age(&payload.input, clock.now())),
        FreshnessMode::Descriptor => None,
    };
    HttpResponse::Ok().json(FreshnessResponse { reading, age })
}

#[utoipa::path(
    post,
    path = "/usage",
    request_body = UsageRequest,
    responses(
        (status = 200, description = "Usage summary", body = UsageResponse)
    ),
    tag = "usage"
)]
#[post("/api/usage")]
/// Average a usage series and bucket it.
pub async fn usage(payload: web::Json<UsageRequest>) -> impl Responder {
    let average = average(&payload.values).unwrap_or_else(|err| {
        warn!("{err}; reporting 0");
        0.0
    });
    HttpResponse::Ok().json(UsageResponse {
        average,
        level: UsageLevel::from_average(average),
    })
}

#[utoipa::path(
    post,
    path = "/report",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Entity health report", body = catalog_health_core::EntityHealthReport)
    ),
    tag = "report"
)]
#[post("/api/report")]
/// Assess every health facet of one entity.
pub async fn entity_report(
    state: web::Data<AppState>,
    payload: web::Json<ReportRequest>,
) -> impl Responder {
    let payload = payload.into_inner();
    let scorer = CompletenessScorer::new(
        state.spec_for(payload.kind).clone(),
        payload.kind.default_presence(),
    );
    let mut assessor = EntityAssessor::new(payload.kind, state.clock.now()).with_scorer(scorer);
    if let Some(version) = payload.current_version {
        assessor = assessor.with_current_version(version);
    }
    let source = payload.source.unwrap_or_else(|| "request".to_string());
    HttpResponse::Ok().json(assessor.assess(source, &payload.entity))
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};
    use catalog_health_core::{
        EntityHealthReport, FixedClock, FreshnessTier, LoadStatus, StatusProgress,
    };
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            FieldSpecTable::data_model(),
            FieldSpecTable::data_product(),
            Arc::new(FixedClock(now())),
        ))
    }

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(test_state())
                    .service(score_completeness)
                    .service(score_version_health)
                    .service(status_progress)
                    .service(status_rollup)
                    .service(freshness)
                    .service(usage)
                    .service(entity_report)
                    .service(openapi_json),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn completeness_uses_kind_defaults() {
        let app = test_app!();
        let payload = CompletenessRequest {
            entity: json!({ "name": "Orders", "tags": [] }),
            kind: EntityKind::Product,
            spec: None,
            presence: None,
        };
        let req = test::TestRequest::post()
            .uri("/api/score/completeness")
            .set_json(&payload)
            .to_request();
        let resp: CompletenessResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.result.score, 9);
        assert_eq!(resp.result.filled_fields, vec!["name".to_string()]);
        assert_eq!(resp.quality, QualityLevel::VeryPoor);
        assert_eq!(resp.quality_label, "Very Poor");
    }

    #[actix_web::test]
    async fn completeness_accepts_custom_spec_and_presence() {
        let app = test_app!();
        let payload = CompletenessRequest {
            entity: json!({ "name": "Orders", "tags": [] }),
            kind: EntityKind::Product,
            spec: Some(json!({
                "name": { "required": true, "weight": 1 },
                "tags": { "weight": 1 }
            })),
            presence: Some(PresenceStrategy::Simple),
        };
        let req = test::TestRequest::post()
            .uri("/api/score/completeness")
            .set_json(&payload)
            .to_request();
        let resp: CompletenessResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.result.score, 100);
        assert_eq!(resp.quality, QualityLevel::Excellent);
    }

    #[actix_web::test]
    async fn completeness_rejects_invalid_spec() {
        let app = test_app!();
        let payload = CompletenessRequest {
            entity: json!({}),
            kind: EntityKind::Model,
            spec: Some(json!({ "name": { "weight": -1 } })),
            presence: None,
        };
        let req = test::TestRequest::post()
            .uri("/api/score/completeness")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.starts_with("invalid field spec at name:"));
        assert!(body.message.contains("weight must be a positive number"));
    }

    #[actix_web::test]
    async fn version_health_reports_penalty_and_explanation() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/score/version-health")
            .set_json(json!({ "delivered": ["1.0.0", "1.1.0"], "current": "2.0.0" }))
            .to_request();
        let resp: VersionHealthResponse = test::call_and_read_body_json(&app, req).await;

        let result = resp.result.expect("result");
        assert_eq!(result.health, 70);
        assert_eq!(result.multi_version_penalty, 15);
        assert!(resp.explanation.expect("explanation").contains("maintaining multiple versions"));
    }

    #[actix_web::test]
    async fn version_health_returns_null_for_missing_inputs() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/score/version-health")
            .set_json(json!({ "delivered": "1.0.0", "current": "" }))
            .to_request();
        let resp: VersionHealthResponse = test::call_and_read_body_json(&app, req).await;

        assert!(resp.result.is_none());
        assert!(resp.explanation.is_none());
    }

    #[actix_web::test]
    async fn version_health_rejects_malformed_versions() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/score/version-health")
            .set_json(json!({ "delivered": "1.0", "current": "2.0.0" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert!(body.message.starts_with("invalid version format"));
    }

    #[actix_web::test]
    async fn status_progress_reads_hints() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/status/progress")
            .set_json(json!({
                "status": "running",
                "hints": { "currentStep": 3, "processSteps": [1, 2, 3, 4, 5] }
            }))
            .to_request();
        let resp: StatusProgress = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.percent, 60);
        assert_eq!(resp.label, "Running");

        let req = test::TestRequest::post()
            .uri("/api/status/progress")
            .set_json(json!({ "status": "failed" }))
            .to_request();
        let resp: StatusProgress = test::call_and_read_body_json(&app, req).await;
        assert_eq!((resp.percent, resp.label.as_str()), (50, "Failed"));
    }

    #[actix_web::test]
    async fn status_rollup_prefers_running() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/status/rollup")
            .set_json(json!({ "statuses": ["done", "failed", "running"] }))
            .to_request();
        let resp: RollupResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.status, PipelineRollup::Running);
    }

    #[actix_web::test]
    async fn freshness_supports_both_modes() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/freshness")
            .set_json(json!({ "input": "3 days ago", "mode": "descriptor" }))
            .to_request();
        let resp: FreshnessResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.reading.percent, 91);
        assert!(resp.age.is_none());

        let two_days_ago = (now() - Duration::days(2)).timestamp_millis();
        let req = test::TestRequest::post()
            .uri("/api/freshness")
            .set_json(json!({ "input": two_days_ago, "mode": "delta" }))
            .to_request();
        let resp: FreshnessResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.reading.percent, 60);
        assert_eq!(resp.age.as_deref(), Some("2 days ago"));

        let req = test::TestRequest::post()
            .uri("/api/freshness")
            .set_json(json!({ "input": "garbage", "mode": "delta" }))
            .to_request();
        let resp: FreshnessResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.reading.percent, 0);
        assert_eq!(resp.reading.tier, FreshnessTier::Unknown);
    }

    #[actix_web::test]
    async fn usage_defaults_to_zero_for_empty_series() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/usage")
            .set_json(json!({ "values": [] }))
            .to_request();
        let resp: UsageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.average, 0.0);
        assert_eq!(resp.level, UsageLevel::Low);

        let req = test::TestRequest::post()
            .uri("/api/usage")
            .set_json(json!({ "values": [60, 70] }))
            .to_request();
        let resp: UsageResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(resp.average, 65.0);
        assert_eq!(resp.level, UsageLevel::High);
    }

    #[actix_web::test]
    async fn report_assesses_entity() {
        let app = test_app!();
        let payload = ReportRequest {
            entity: json!({
                "name": "Customer",
                "version": "1.0.0",
                "status": "backlog",
                "freshness": "monthly"
            }),
            kind: EntityKind::Model,
            current_version: Some("1.0.1".to_string()),
            source: None,
        };
        let req = test::TestRequest::post()
            .uri("/api/report")
            .set_json(&payload)
            .to_request();
        let resp: EntityHealthReport = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp.source, "request");
        assert_eq!(resp.load_status, LoadStatus::Loaded);
        assert_eq!(resp.version_health.map(|health| health.health), Some(95));
        assert_eq!(resp.status.map(|status| status.percent), Some(25));
        assert_eq!(resp.freshness.map(|reading| reading.percent), Some(50));
    }

    #[actix_web::test]
    async fn openapi_json_is_served() {
        let app = test_app!();
        let req = test::TestRequest::get()
            .uri("/api/openapi.json")
            .to_request();
        let resp: Value = test::call_and_read_body_json(&app, req).await;
        assert!(resp["paths"]["/score/completeness"].is_object());
    }
}
