use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use directory::{
    CompensationGuard, Employee, EmployeeInput, EmployeeStore, ReportingStructure, hierarchy,
    store::read_employee,
};
use platform_api::{ApiError, ApiResult};
use platform_db::{DbPool, SqlCompensationStore, SqlEmployeeStore, UnknownReportRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    fn employees(&self) -> SqlEmployeeStore {
        SqlEmployeeStore::new(self.pool.clone())
    }

    fn compensations(&self) -> SqlCompensationStore {
        SqlCompensationStore::new(self.pool.clone())
    }
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "directory server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/employee", post(create_employee))
        .route("/employee/{id}", get(read_employee_handler).put(update_employee))
        .route(
            "/employee/{id}/reporting-structure",
            get(read_reporting_structure),
        )
        .route(
            "/employee/{id}/compensation",
            post(create_compensation).get(read_compensation),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

/// Path ids are opaque; one that is not a UUID cannot name any employee, so
/// it resolves to not-found rather than bad-request.
fn parse_employee_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("invalid employeeId: {raw}")))
}

fn map_store_error(err: anyhow::Error) -> ApiError {
    if err.downcast_ref::<UnknownReportRef>().is_some() {
        ApiError::InvalidInput(err.to_string())
    } else {
        ApiError::internal(err)
    }
}

async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    debug!(first_name = %input.first_name, "employee create request");
    let employee = state
        .employees()
        .insert(input)
        .await
        .map_err(map_store_error)?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn read_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    let id = parse_employee_id(&id)?;
    let employee = read_employee(&state.employees(), id).await?;
    Ok(Json(employee))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<Json<Employee>> {
    let id = parse_employee_id(&id)?;
    let store = state.employees();
    // The path id must already resolve; the id itself is immutable.
    read_employee(&store, id).await?;
    let employee = store.update(id, input).await.map_err(map_store_error)?;
    Ok(Json(employee))
}

async fn read_reporting_structure(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReportingStructure>> {
    let id = parse_employee_id(&id)?;
    let structure = hierarchy::reporting_structure(&state.employees(), id).await?;
    Ok(Json(structure))
}

/// Compensation create body. An embedded employee object, if any, is ignored
/// in favor of the path id.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompensationInput {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    salary: Decimal,
    effective_date: NaiveDate,
}

async fn create_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CompensationInput>,
) -> ApiResult<(StatusCode, Json<directory::Compensation>)> {
    let id = parse_employee_id(&id)?;
    debug!(
        employee_id = %id,
        effective_date = %input.effective_date,
        "compensation create request"
    );
    let employee = read_employee(&state.employees(), id).await?;
    let guard = CompensationGuard::new(state.compensations());
    let record = guard
        .create(employee, input.salary, input.effective_date)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn read_compensation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<directory::Compensation>> {
    let id = parse_employee_id(&id)?;
    // Unknown employees are a 404 of their own before the record lookup.
    read_employee(&state.employees(), id).await?;
    let guard = CompensationGuard::new(state.compensations());
    let record = guard.read(id).await?;
    Ok(Json(record))
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = state.pool.ping().await.is_ok();
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}
