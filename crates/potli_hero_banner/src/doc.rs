// --- File: crates/potli_hero_banner/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use crate::handlers::{CreateBannerRequest, ListBannersQuery, UpdateBannerRequest};
use crate::service::BannerOrder;
use potli_common::models::HeroBanner;
use potli_common::services::UploadedFile;
use utoipa::OpenApi;

#[utoipa::path(
    get,
    path = "/admin/hero-banners",
    params(ListBannersQuery),
    responses(
        (status = 200, description = "{banners, count} ordered by sort_order"),
        (status = 500, description = "Failed to fetch hero banners")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_list_banners_handler() {}

#[utoipa::path(
    post,
    path = "/admin/hero-banners",
    request_body(content = CreateBannerRequest, example = json!({
        "title": "Diwali sale",
        "image_url": "https://media.techpotli.com/diwali.jpg",
        "redirect_url": "/collections/diwali"
    })),
    responses(
        (status = 201, description = "{banner}"),
        (status = 400, description = "image_url is required")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_create_banner_handler() {}

#[utoipa::path(
    get,
    path = "/admin/hero-banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    responses(
        (status = 200, description = "{banner}"),
        (status = 404, description = "Hero banner not found")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_get_banner_handler() {}

#[utoipa::path(
    patch,
    path = "/admin/hero-banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    request_body(content = UpdateBannerRequest, example = json!({"is_active": false})),
    responses(
        (status = 200, description = "{banner}"),
        (status = 400, description = "No fields provided for update"),
        (status = 404, description = "Hero banner not found")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_update_banner_handler() {}

#[utoipa::path(
    delete,
    path = "/admin/hero-banners/{id}",
    params(("id" = String, Path, description = "Banner id")),
    responses((status = 200, description = "Hero banner deleted successfully")),
    tag = "Hero Banners Admin"
)]
fn doc_delete_banner_handler() {}

#[utoipa::path(
    patch,
    path = "/admin/hero-banners/batch",
    request_body(content = Vec<BannerOrder>, description = "Wrapped as {orders: [...]}", example = json!({
        "orders": [{"id": "hb_1", "sort_order": 0}, {"id": "hb_2", "sort_order": 1}]
    })),
    responses(
        (status = 200, description = "{banners} in the new order"),
        (status = 400, description = "Malformed orders")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_reorder_banners_handler() {}

#[utoipa::path(
    post,
    path = "/admin/hero-banners/upload",
    request_body(content_type = "multipart/form-data", description = "Image in field `file`"),
    responses(
        (status = 200, description = "Stored image", body = UploadedFile),
        (status = 400, description = "Missing, empty or oversized file"),
        (status = 500, description = "Failed to upload image")
    ),
    tag = "Hero Banners Admin"
)]
fn doc_upload_banner_image_handler() {}

#[utoipa::path(
    get,
    path = "/store/hero-banners",
    responses((status = 200, description = "{banners, count}, active only, cacheable for 5 minutes")),
    tag = "Hero Banners"
)]
fn doc_store_banners_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_list_banners_handler,
        doc_create_banner_handler,
        doc_get_banner_handler,
        doc_update_banner_handler,
        doc_delete_banner_handler,
        doc_reorder_banners_handler,
        doc_upload_banner_image_handler,
        doc_store_banners_handler,
    ),
    components(schemas(HeroBanner, CreateBannerRequest, UpdateBannerRequest, BannerOrder, UploadedFile)),
    tags(
        (name = "Hero Banners", description = "Storefront banner feed"),
        (name = "Hero Banners Admin", description = "Banner management")
    )
)]
pub struct HeroBannerApiDoc;
