use crate::api::config::ApiConfig;
use crate::api::error::{ApiError, ApiInitError, Result};
use crate::api::types::{
    ExecuteBody, ExecuteResponse, HealthResponse, LanguagesResponse, QuickBody, QuickResponse,
};
use crate::engine::{Engine, EvaluationRequest};
use crate::language::Language;
use crate::sandbox::ExecutionRequest;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

const SERVICE_NAME: &str = "codegrade-execution-service";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

/// Build the router with every route and the body limit
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/execute", post(execute))
        .route("/api/execute/quick", post(execute_quick))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// HTTP server bound to a TCP listener
pub struct ApiServer {
    listener: TcpListener,
    router: Router,
}

impl ApiServer {
    /// Bind the listener; port 0 picks an ephemeral port
    pub async fn bind(config: &ApiConfig, state: AppState) -> std::result::Result<Self, ApiInitError> {
        let addr = config.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiInitError::BindFailed(e.to_string()))?;

        if let Ok(local) = listener.local_addr() {
            info!(addr = %local, "API listening");
        }

        Ok(Self {
            listener,
            router: router(state, config.body_limit),
        })
    }

    /// Get local socket address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}

/// Shared validation for both execute endpoints
fn validate_fields(code: Option<String>, language: Option<String>) -> Result<(String, Language)> {
    let (code, language) = match (code, language) {
        (Some(code), Some(language)) if !code.is_empty() && !language.is_empty() => {
            (code, language)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Missing required fields: code and language".to_string(),
            ));
        }
    };
    let language = language.parse::<Language>().map_err(|_| {
        ApiError::BadRequest("Invalid language. Must be python, java, or cpp".to_string())
    })?;
    Ok((code, language))
}

/// Reject oversized sources and fail fast when the runtime is down
async fn ready_to_run(engine: &Engine, code: &str) -> Result<()> {
    engine
        .sandbox()
        .validate(code)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    engine
        .sandbox()
        .ping()
        .await
        .map_err(|e| ApiError::ServiceUnavailable(e.to_string()))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: Language::ALL.iter().map(Language::info).collect(),
    })
}

async fn execute(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExecuteBody>, JsonRejection>,
) -> Result<Json<ExecuteResponse>> {
    let Json(body) = payload?;
    let (code, language) = validate_fields(body.code, body.language)?;
    ready_to_run(&state.engine, &code).await?;

    let request = EvaluationRequest {
        source: code,
        language,
        test_cases: body.test_cases.unwrap_or_default(),
        structural_constraints: body.structural_constraints.unwrap_or_default(),
        task_marks: body.task_marks,
    };

    info!(
        %language,
        test_cases = request.test_cases.len(),
        constraints = request.structural_constraints.len(),
        "executing submission"
    );

    let engine = Arc::clone(&state.engine);
    let result = tokio::spawn(async move { engine.evaluate(&request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Evaluation task failed: {e}")))?;

    info!(
        %language,
        score = result.final_score,
        max_score = result.max_score,
        "submission graded"
    );
    Ok(Json(ExecuteResponse::from(&result)))
}

async fn execute_quick(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuickBody>, JsonRejection>,
) -> Result<Json<QuickResponse>> {
    let Json(body) = payload?;
    let (code, language) = validate_fields(body.code, body.language)?;
    ready_to_run(&state.engine, &code).await?;

    info!(%language, "quick execution");

    let request = ExecutionRequest::new(language, code, body.input.unwrap_or_default());
    let engine = Arc::clone(&state.engine);
    let run = tokio::spawn(async move { engine.run(request).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Execution task failed: {e}")))?
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(QuickResponse::from(run)))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
