//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::assign::{summarize_workload, AssignmentSelector, WorkloadSummary};
use crate::config::Config;
use crate::llm::OpenRouterClient;
use crate::plan::{
    LlmPlanModel, PlanConfig, PlanError, PlanModel, PlanOrchestrator, MAX_RETRIES_LIMIT,
};

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Selector with the skill alias table, built once at startup
    pub selector: AssignmentSelector,
    /// The model behind plan generation
    pub planner: Arc<dyn PlanModel>,
    /// Fired on shutdown to abandon in-flight plan generations
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, planner: Arc<dyn PlanModel>) -> Self {
        Self {
            config,
            selector: AssignmentSelector::default(),
            planner,
            shutdown: CancellationToken::new(),
        }
    }
}

/// Build the API router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/assignments", post(assign_tasks))
        .route("/api/plans", post(generate_plan))
        .route("/api/analytics/workload", post(workload_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let client = Arc::new(OpenRouterClient::new(config.api_key.clone()));
    let planner: Arc<dyn PlanModel> =
        Arc::new(LlmPlanModel::new(client, config.default_model.clone()));

    let state = Arc::new(AppState::new(config.clone(), planner));
    let app = router(Arc::clone(&state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Setup graceful shutdown on SIGTERM/SIGINT
    let shutdown_state = Arc::clone(&state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal(shutdown_state).await;
        })
        .await?;

    Ok(())
}

/// Wait for a shutdown signal, then cancel in-flight plan generations.
async fn shutdown_signal(state: Arc<AppState>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling plan generations");
    state.shutdown.cancel();
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.default_model.clone(),
    })
}

/// Pick the best member for each submitted task.
async fn assign_tasks(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AssignRequest>,
) -> Json<AssignResponse> {
    let assignments = state.selector.assign_all(&req.tasks, &req.members);
    tracing::info!(
        tasks = req.tasks.len(),
        members = req.members.len(),
        assigned = assignments.len(),
        "Auto-assignment complete"
    );
    Json(AssignResponse { assignments })
}

/// Generate a task plan with the configured model.
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    let config = plan_config(&state.config.plan, &req)?;
    let orchestrator = PlanOrchestrator::new(Arc::clone(&state.planner), config);
    let plan_id = Uuid::new_v4();

    tracing::info!(%plan_id, title = %req.request.project_title, "Generating plan");

    let cancel = state.shutdown.child_token();
    let outcome = orchestrator
        .generate_with_cancel(&req.request, &cancel)
        .await
        .map_err(|e| {
            tracing::warn!(%plan_id, "Plan generation failed: {}", e);
            (plan_error_status(&e), e.to_string())
        })?;

    Ok(Json(PlanResponse {
        plan_id,
        tasks: outcome.items,
        attempts: outcome.attempts,
        stage: outcome.stage,
        generated_at: chrono::Utc::now(),
    }))
}

/// Summarize roster utilization.
async fn workload_summary(Json(req): Json<WorkloadRequest>) -> Json<WorkloadSummary> {
    Json(summarize_workload(&req.members))
}

/// Apply per-request overrides on top of the configured plan settings.
fn plan_config(
    base: &PlanConfig,
    req: &CreatePlanRequest,
) -> Result<PlanConfig, (StatusCode, String)> {
    let mut config = base.clone();
    if let Some(max_retries) = req.max_retries {
        if max_retries > MAX_RETRIES_LIMIT {
            return Err((
                StatusCode::BAD_REQUEST,
                format!(
                    "maxRetries must be at most {}, got {}",
                    MAX_RETRIES_LIMIT, max_retries
                ),
            ));
        }
        config.max_retries = max_retries;
    }
    if let Some(temperature) = req.temperature {
        if !temperature.is_finite() || temperature < 0.0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("temperature must be a non-negative number, got {}", temperature),
            ));
        }
        config.temperature = temperature;
    }
    Ok(config)
}

fn plan_error_status(error: &PlanError) -> StatusCode {
    match error {
        PlanError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        PlanError::RetriesExhausted { last_error, .. } => match last_error.as_ref() {
            PlanError::Model(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        },
        PlanError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::{Candidate, SkillSet, TaskRequirement};
    use crate::plan::{PlanPrompt, PlanRequest};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedModel(Result<&'static str, &'static str>);

    #[async_trait]
    impl PlanModel for FixedModel {
        async fn generate(&self, _prompt: &PlanPrompt, _temperature: f64) -> anyhow::Result<String> {
            self.0.map(str::to_string).map_err(anyhow::Error::msg)
        }
    }

    fn state_with(model: FixedModel) -> Arc<AppState> {
        let mut config = Config::new("sk-test".to_string(), "test/model".to_string());
        config.plan.retry_base_delay = Duration::ZERO;
        Arc::new(AppState::new(config, Arc::new(model)))
    }

    fn plan_request(title: &str) -> CreatePlanRequest {
        CreatePlanRequest {
            request: PlanRequest::new(title, "Ship it", ""),
            max_retries: Some(1),
            temperature: None,
        }
    }

    #[tokio::test]
    async fn health_reports_model() {
        let Json(body) = health(State(state_with(FixedModel(Ok("[]"))))).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.model, "test/model");
    }

    #[tokio::test]
    async fn assigns_best_member() {
        let state = state_with(FixedModel(Ok("[]")));
        let req = AssignRequest {
            tasks: vec![TaskRequirement::new(
                "t1",
                "Write docs",
                SkillSet::new().with("documentation", 1.0),
            )],
            members: vec![
                Candidate::new("u1", "Alice", 40.0).with_skills(SkillSet::new().with("react", 0.9)),
                Candidate::new("u2", "Bob", 40.0).with_skills(SkillSet::new().with("node", 0.9)),
            ],
        };
        let Json(body) = assign_tasks(State(state), Json(req)).await;
        assert_eq!(body.assignments.len(), 1);
        assert_eq!(body.assignments[0].assignee_id, "u1");
    }

    #[tokio::test]
    async fn plan_endpoint_returns_tasks() {
        let state = state_with(FixedModel(Ok(
            r#"[{"title": "Setup", "description": "Init", "estimatedHours": 3, "requiredSkills": {"node": 0.5}}]"#,
        )));
        let Json(body) = generate_plan(State(state), Json(plan_request("MVP")))
            .await
            .unwrap();
        assert_eq!(body.tasks.len(), 1);
        assert_eq!(body.attempts, 1);
    }

    #[tokio::test]
    async fn blank_plan_request_is_bad_request() {
        let state = state_with(FixedModel(Ok("[]")));
        let mut req = plan_request("");
        req.request.project_goal.clear();
        let (status, _) = generate_plan(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unparseable_plans_are_unprocessable() {
        let state = state_with(FixedModel(Ok("no plan today")));
        let (status, message) = generate_plan(State(state), Json(plan_request("MVP")))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(message.contains("after 2 attempts"));
    }

    #[tokio::test]
    async fn model_outage_is_unavailable() {
        let state = state_with(FixedModel(Err("Server error (HTTP 502): bad gateway")));
        let (status, _) = generate_plan(State(state), Json(plan_request("MVP")))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn shutdown_cancels_plan_generation() {
        let state = state_with(FixedModel(Ok("[]")));
        state.shutdown.cancel();
        let (status, message) = generate_plan(State(state), Json(plan_request("MVP")))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(message.contains("cancelled"));
    }

    struct CountingModel(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl PlanModel for CountingModel {
        async fn generate(&self, _prompt: &PlanPrompt, _temperature: f64) -> anyhow::Result<String> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok("not a plan".to_string())
        }
    }

    #[tokio::test]
    async fn retry_override_is_capped() {
        let model = Arc::new(CountingModel(Default::default()));
        let mut config = Config::new("sk-test".to_string(), "test/model".to_string());
        config.plan.retry_base_delay = Duration::ZERO;
        let state = Arc::new(AppState::new(config, model.clone()));

        let mut req = plan_request("MVP");
        req.max_retries = Some(u32::MAX);
        let (status, message) = generate_plan(State(Arc::clone(&state)), Json(req))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("maxRetries"));
        assert_eq!(model.0.load(std::sync::atomic::Ordering::SeqCst), 0);

        let mut req = plan_request("MVP");
        req.max_retries = Some(MAX_RETRIES_LIMIT);
        let (status, _) = generate_plan(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            model.0.load(std::sync::atomic::Ordering::SeqCst),
            MAX_RETRIES_LIMIT as usize + 1
        );
    }

    #[tokio::test]
    async fn negative_temperature_is_rejected() {
        let state = state_with(FixedModel(Ok("[]")));
        let mut req = plan_request("MVP");
        req.temperature = Some(-1.0);
        let (status, _) = generate_plan(State(state), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn workload_endpoint_summarizes_members() {
        let req = WorkloadRequest {
            members: vec![Candidate::new("u1", "Alice", 40.0).with_assigned_hours(20.0)],
        };
        let Json(summary) = workload_summary(Json(req)).await;
        assert_eq!(summary.total_members, 1);
    }
}
