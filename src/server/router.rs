use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use catalog_interceptors::prelude::*;
use catalog_types::message::*;
use catalog_types::method;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use super::error::ApiError;
use super::ndjson;
use super::state::{request_id, GatewayState};
use crate::metrics;

const STREAM_BUFFER: usize = 16;

pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/v1/auth/login", post(login))
        .route("/v1/laptops", post(create_laptop))
        .route("/v1/laptops/search", post(search_laptop))
        .route("/v1/laptops/rate", post(rate_laptop))
        .route("/v1/laptops/:id/image", post(upload_image))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn health(State(state): State<GatewayState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "laptops": state.laptop_count().await,
    }))
}

async fn metrics_handler() -> Response {
    match metrics::render() {
        Ok(text) => ([(CONTENT_TYPE, "text/plain; version=0.0.4")], text).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn login(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let cx = state.call_context(method::LOGIN, &headers)?;
    let tag = ApiError::tagged(request_id(&cx));
    Ok(Json(state.server().login(cx, request).await.map_err(tag)?))
}

async fn create_laptop(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<CreateLaptopRequest>,
) -> Result<Json<CreateLaptopResponse>, ApiError> {
    let cx = state.call_context(method::CREATE_LAPTOP, &headers)?;
    let tag = ApiError::tagged(request_id(&cx));
    Ok(Json(state.server().create_laptop(cx, request).await.map_err(tag)?))
}

async fn search_laptop(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(request): Json<SearchLaptopRequest>,
) -> Result<Response, ApiError> {
    let cx = state.call_context(method::SEARCH_LAPTOP, &headers)?;
    let id = request_id(&cx);
    let guard = cx.signal.cancel_token().drop_guard();
    let matches = state
        .server()
        .search_laptop(cx, request)
        .await
        .map_err(ApiError::tagged(id.clone()))?;
    Ok(ndjson::response(matches, guard, id))
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    #[serde(rename = "type", default)]
    image_type: String,
}

async fn upload_image(
    State(state): State<GatewayState>,
    Path(laptop_id): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let cx = state.call_context(method::UPLOAD_IMAGE, &headers)?;
    let tag = ApiError::tagged(request_id(&cx));
    let (sink, requests) = channel(STREAM_BUFFER);

    let pump = tokio::spawn(async move {
        if sink
            .send(UploadImageRequest::info(laptop_id, query.image_type))
            .await
            .is_err()
        {
            return;
        }
        let mut chunks = body.into_data_stream();
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(chunk) => {
                    let data = UploadImageRequest::ChunkData(chunk.to_vec());
                    if sink.send(data).await.is_err() {
                        debug!("upload ended before the request body");
                        return;
                    }
                }
                Err(err) => {
                    sink.fail(Status::invalid_argument(format!(
                        "cannot receive chunk data: {err}"
                    )))
                    .await;
                    return;
                }
            }
        }
    });

    let result = state.server().upload_image(cx, requests).await;
    pump.abort();
    Ok(Json(result.map_err(tag)?))
}

async fn rate_laptop(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let cx = state.call_context(method::RATE_LAPTOP, &headers)?;
    let id = request_id(&cx);
    let guard = cx.signal.cancel_token().drop_guard();
    let (sink, requests) = channel::<RateLaptopRequest>(STREAM_BUFFER);
    tokio::spawn(ndjson::pump_lines(body, sink));

    let responses = state
        .server()
        .rate_laptop(cx, requests)
        .await
        .map_err(ApiError::tagged(id.clone()))?;
    Ok(ndjson::response(responses, guard, id))
}
