use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use certvault_core::{Certificate, Error, Ledger, Transfer};

use crate::auth::{OWNER_HEADER, basic_credentials, owner_context};
use crate::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
}

type ApiResult<T> = Result<T, ApiError>;

/// Build the application router with every certificate and transfer route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/certificates", get(all_certificates))
        .route("/certificates/create", post(create_certificate))
        .route("/certificates/update", put(update_certificate))
        .route("/certificates/{id}", get(get_certificate))
        .route("/certificates/{id}/delete", delete(delete_certificate))
        .route("/users/{user_id}/certificates", get(user_certificates))
        .route("/certificates/{id}/transfers/create", post(create_transfer))
        .route("/certificates/{id}/transfers/accept", put(accept_transfer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy for the given origins; `"*"` (or an empty list) allows any.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| {
                HeaderValue::from_str(o)
                    .inspect_err(|e| warn!(origin = %o, error = %e, "Ignoring invalid CORS origin"))
                    .ok()
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static(OWNER_HEADER),
        ])
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedPayload(e.to_string()))
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

/// `GET /health`
async fn health() -> impl IntoResponse {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /certificates`
async fn all_certificates(State(state): State<AppState>) -> Json<Vec<Certificate>> {
    Json(state.ledger.list_certificates().await)
}

/// `GET /certificates/{id}`
async fn get_certificate(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Certificate>> {
    Ok(Json(state.ledger.get_certificate(&id).await?))
}

/// `POST /certificates/create`: owner taken from the `OwnerID` header.
async fn create_certificate(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let cert: Certificate = parse_json(&body)?;
    let created = state
        .ledger
        .create_certificate(cert, owner_context(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /certificates/update`: creates the record when it does not exist,
/// which then requires the `OwnerID` header.
async fn update_certificate(
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<Certificate>> {
    let cert: Certificate = parse_json(&body)?;
    let updated = state
        .ledger
        .update_certificate(cert, owner_context(&headers))
        .await?;
    Ok(Json(updated))
}

/// `DELETE /certificates/{id}/delete`
async fn delete_certificate(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<&'static str> {
    state.ledger.delete_certificate(&id).await?;
    Ok("200 Delete Successful")
}

/// `GET /users/{user_id}/certificates`
async fn user_certificates(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Certificate>>> {
    Ok(Json(state.ledger.certificates_of(&user_id).await?))
}

/// `POST /certificates/{id}/transfers/create`: Basic auth as the owner.
async fn create_transfer(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    info!(cert_id = %id, "Attempt to create transfer");
    let proposal: Transfer = parse_json(&body)?;
    let credentials = basic_credentials(&headers)?;
    let created = state
        .ledger
        .propose_transfer(&id, proposal, &credentials)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /certificates/{id}/transfers/accept`: Basic auth as the recipient.
async fn accept_transfer(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> ApiResult<&'static str> {
    info!(cert_id = %id, "Attempt to accept transfer");
    let credentials = basic_credentials(&headers)?;
    state.ledger.accept_transfer(&id, &credentials).await?;
    Ok("Transfer Accepted")
}
