use crate::error::HeroBannerError;
use crate::service::{BannerOrder, CreateHeroBanner, HeroBannerService, UpdateHeroBanner};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use potli_common::services::{SharedFileProvider, UploadFile};
use potli_common::{failure_response, message_response, JsonResponse};
use potli_config::AppConfig;
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use std::fmt::Display;
use std::sync::Arc;
use tracing::error;

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

pub const STORE_CACHE_CONTROL: &str = "public, max-age=300, stale-while-revalidate=600";

#[derive(Clone)]
pub struct HeroBannerState {
    pub config: Arc<AppConfig>,
    pub banners: Arc<HeroBannerService>,
    /// Storage used by `/upload`; `None` when no file provider is configured.
    pub files: Option<SharedFileProvider>,
}

fn server_error(message: &str, err: impl Display) -> JsonResponse {
    error!("{}: {}", message, err);
    failure_response(StatusCode::INTERNAL_SERVER_ERROR, message, err)
}

fn not_found() -> JsonResponse {
    message_response(StatusCode::NOT_FOUND, "Hero banner not found")
}

fn bad_request(message: impl Into<String>) -> JsonResponse {
    message_response(StatusCode::BAD_REQUEST, message)
}

// Present-but-null becomes `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg_attr(feature = "openapi", derive(IntoParams))]
#[derive(Deserialize, Debug, Default)]
pub struct ListBannersQuery {
    /// `true` keeps active banners, any other value keeps inactive ones.
    pub is_active: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct CreateBannerRequest {
    pub title: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "https://media.techpotli.com/diwali.jpg"))]
    pub image_url: Option<String>,
    pub redirect_url: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[derive(Deserialize, Debug, Default)]
pub struct UpdateBannerRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub title: Option<Option<String>>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<String>))]
    pub redirect_url: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i64>,
}

impl From<UpdateBannerRequest> for UpdateHeroBanner {
    fn from(req: UpdateBannerRequest) -> Self {
        Self {
            title: req.title,
            image_url: req.image_url,
            redirect_url: req.redirect_url,
            is_active: req.is_active,
            sort_order: req.sort_order,
        }
    }
}

// --- Admin ---

#[axum::debug_handler]
pub async fn list_banners_handler(
    State(state): State<Arc<HeroBannerState>>,
    Query(query): Query<ListBannersQuery>,
) -> JsonResponse {
    let is_active = query.is_active.map(|v| v == "true");
    match state.banners.list_admin(is_active).await {
        Ok(banners) => (
            StatusCode::OK,
            Json(json!({ "count": banners.len(), "banners": banners })),
        ),
        Err(e) => server_error("Failed to fetch hero banners", e),
    }
}

#[axum::debug_handler]
pub async fn create_banner_handler(
    State(state): State<Arc<HeroBannerState>>,
    Json(payload): Json<CreateBannerRequest>,
) -> JsonResponse {
    let Some(image_url) = payload.image_url.filter(|u| !u.trim().is_empty()) else {
        return bad_request("image_url is required");
    };

    let input = CreateHeroBanner {
        title: payload.title,
        image_url,
        redirect_url: payload.redirect_url,
        is_active: payload.is_active,
        sort_order: payload.sort_order,
    };
    match state.banners.create(input).await {
        Ok(banner) => (StatusCode::CREATED, Json(json!({ "banner": banner }))),
        Err(HeroBannerError::Validation(msg)) => bad_request(msg),
        Err(e) => server_error("Failed to create hero banner", e),
    }
}

#[axum::debug_handler]
pub async fn get_banner_handler(
    State(state): State<Arc<HeroBannerState>>,
    Path(id): Path<String>,
) -> JsonResponse {
    match state.banners.retrieve(&id).await {
        Ok(banner) => (StatusCode::OK, Json(json!({ "banner": banner }))),
        Err(HeroBannerError::NotFound(_)) => not_found(),
        Err(e) => server_error("Failed to fetch hero banner", e),
    }
}

/// Partial update; `{ "is_active": false }` toggles a banner off.
#[axum::debug_handler]
pub async fn update_banner_handler(
    State(state): State<Arc<HeroBannerState>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBannerRequest>,
) -> JsonResponse {
    let changes = UpdateHeroBanner::from(payload);
    if changes.is_empty() {
        return bad_request("No fields provided for update");
    }

    match state.banners.update(&id, changes).await {
        Ok(banner) => (StatusCode::OK, Json(json!({ "banner": banner }))),
        Err(HeroBannerError::NotFound(_)) => not_found(),
        Err(e) => server_error("Failed to update hero banner", e),
    }
}

#[axum::debug_handler]
pub async fn delete_banner_handler(
    State(state): State<Arc<HeroBannerState>>,
    Path(id): Path<String>,
) -> JsonResponse {
    match state.banners.delete(&id).await {
        Ok(()) => message_response(StatusCode::OK, "Hero banner deleted successfully"),
        Err(e) => server_error("Failed to delete hero banner", e),
    }
}

fn parse_orders(body: &Value) -> Result<Vec<BannerOrder>, JsonResponse> {
    let Some(orders) = body.get("orders").and_then(Value::as_array) else {
        return Err(bad_request("orders must be an array"));
    };
    if orders.is_empty() {
        return Err(bad_request("orders array cannot be empty"));
    }

    orders
        .iter()
        .map(|order| {
            let id = order.get("id").and_then(Value::as_str).filter(|id| !id.is_empty());
            let sort_order = order.get("sort_order").and_then(Value::as_f64);
            match (id, sort_order) {
                (Some(id), Some(sort_order)) => Ok(BannerOrder {
                    id: id.to_string(),
                    sort_order: sort_order as i64,
                }),
                _ => Err(bad_request(
                    "Each order must have id (string) and sort_order (number)",
                )),
            }
        })
        .collect()
}

/// Body: `{ "orders": [{ "id": "hb_...", "sort_order": 0 }, ...] }`
#[axum::debug_handler]
pub async fn reorder_banners_handler(
    State(state): State<Arc<HeroBannerState>>,
    Json(body): Json<Value>,
) -> JsonResponse {
    let orders = match parse_orders(&body) {
        Ok(orders) => orders,
        Err(response) => return response,
    };
    match state.banners.reorder(orders).await {
        Ok(banners) => (StatusCode::OK, Json(json!({ "banners": banners }))),
        Err(e) => server_error("Failed to reorder hero banners", e),
    }
}

struct ReceivedFile {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn read_file_field(mut multipart: Multipart) -> Result<Option<ReceivedFile>, JsonResponse> {
    let parse_error = |e: axum::extract::multipart::MultipartError| {
        failure_response(StatusCode::BAD_REQUEST, "Failed to parse form data", e)
    };

    while let Some(field) = multipart.next_field().await.map_err(parse_error)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(parse_error)?;
        return Ok(Some(ReceivedFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Multipart upload of a banner image; field name `file`.
#[axum::debug_handler]
pub async fn upload_banner_image_handler(
    State(state): State<Arc<HeroBannerState>>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> JsonResponse {
    let is_multipart = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("multipart/form-data"));
    if !is_multipart {
        return bad_request("Content-Type must be multipart/form-data");
    }
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => return failure_response(StatusCode::BAD_REQUEST, "Failed to parse form data", e),
    };

    let file = match read_file_field(multipart).await {
        Ok(Some(file)) => file,
        Ok(None) => {
            return bad_request("No file provided. Please upload a file with field name 'file'")
        }
        Err(response) => return response,
    };

    let max_bytes = state.config.hero_banner.max_upload_bytes;
    if file.bytes.len() > max_bytes {
        return bad_request(format!(
            "File size exceeds maximum allowed size of {}MB",
            max_bytes / (1024 * 1024)
        ));
    }
    if file.bytes.is_empty() {
        return bad_request("File is empty");
    }

    let Some(files) = state.files.as_ref() else {
        return server_error("Failed to upload image", "no file provider is configured");
    };

    let filename = file
        .filename
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| format!("hero-banner-{}.jpg", Utc::now().timestamp_millis()));
    let content_type = file
        .content_type
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "image/jpeg".to_string());

    match files
        .upload(UploadFile::from_bytes(filename, content_type, file.bytes))
        .await
    {
        Ok(uploaded) => (
            StatusCode::OK,
            Json(json!({ "url": uploaded.url, "key": uploaded.key })),
        ),
        Err(e) => server_error("Failed to upload image", e),
    }
}

// --- Store ---

#[axum::debug_handler]
pub async fn store_banners_handler(State(state): State<Arc<HeroBannerState>>) -> Response {
    match state.banners.list_active().await {
        Ok(banners) => (
            [(header::CACHE_CONTROL, STORE_CACHE_CONTROL)],
            Json(json!({ "count": banners.len(), "banners": banners })),
        )
            .into_response(),
        Err(e) => server_error("Failed to fetch hero banners", e).into_response(),
    }
}
