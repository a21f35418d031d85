//! Product and category handlers

use super::extract::{check_query, ApiJson, ApiPath, ApiQuery};
use crate::error::AppError;
use crate::models::{
    AdminProductListQuery, CategoryBody, CategoryListBody, Featured, FeaturedQuery,
    MessageResponse, Page, ProductBody, ProductListBody, ProductListQuery, SuccessResponse,
};
use crate::state::SharedState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use uuid::Uuid;

// ---- public ---------------------------------------------------------------

/// GET /api/catalog/featured
pub async fn featured(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<FeaturedQuery>,
) -> Result<Json<SuccessResponse<Featured>>, AppError> {
    check_query(&query)?;
    let featured = state.catalog.featured(query.limit).await?;
    Ok(Json(SuccessResponse::with_data("Featured catalog", featured)))
}

/// GET /api/products
pub async fn list_products(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<ProductListQuery>,
) -> Result<Json<SuccessResponse<ProductListBody>>, AppError> {
    check_query(&query)?;
    let products = state
        .catalog
        .published_products(query.category, Page::new(query.limit, query.offset))
        .await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} products", products.len()),
        ProductListBody { products },
    )))
}

/// GET /api/products/{slug}
pub async fn get_product(
    State(state): State<SharedState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<SuccessResponse<ProductBody>>, AppError> {
    let product = state.catalog.published_product(&slug).await?;
    Ok(Json(SuccessResponse::with_data("Product retrieved", ProductBody { product })))
}

/// GET /api/categories
pub async fn list_categories(
    State(state): State<SharedState>,
) -> Result<Json<SuccessResponse<CategoryListBody>>, AppError> {
    let categories = state.catalog.active_categories().await?;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} categories", categories.len()),
        CategoryListBody { categories },
    )))
}

// ---- admin: products ------------------------------------------------------

/// GET /api/admin/products
pub async fn admin_list_products(
    State(state): State<SharedState>,
    ApiQuery(query): ApiQuery<AdminProductListQuery>,
) -> Result<Json<SuccessResponse<ProductListBody>>, AppError> {
    check_query(&query)?;
    let products = state
        .catalog
        .list_products(query.status, Page::new(query.limit, query.offset))
        .await?;

    Ok(Json(SuccessResponse::with_data(
        format!("Found {} products", products.len()),
        ProductListBody { products },
    )))
}

/// POST /api/admin/products
pub async fn create_product(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<SuccessResponse<ProductBody>>), AppError> {
    let product = state.catalog.create_product(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Product created", ProductBody { product })),
    ))
}

/// GET /api/admin/products/{id}
pub async fn admin_get_product(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse<ProductBody>>, AppError> {
    let product = state.catalog.get_product(id).await?;
    Ok(Json(SuccessResponse::with_data("Product retrieved", ProductBody { product })))
}

/// PUT /api/admin/products/{id}
pub async fn update_product(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<ProductBody>>, AppError> {
    let product = state.catalog.update_product(id, &payload).await?;
    Ok(Json(SuccessResponse::with_data("Product updated", ProductBody { product })))
}

/// DELETE /api/admin/products/{id}
pub async fn delete_product(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(Json(MessageResponse::new("Product deleted")))
}

// ---- admin: categories ----------------------------------------------------

/// GET /api/admin/categories
pub async fn admin_list_categories(
    State(state): State<SharedState>,
) -> Result<Json<SuccessResponse<CategoryListBody>>, AppError> {
    let categories = state.catalog.list_categories().await?;
    Ok(Json(SuccessResponse::with_data(
        format!("Found {} categories", categories.len()),
        CategoryListBody { categories },
    )))
}

/// POST /api/admin/categories
pub async fn create_category(
    State(state): State<SharedState>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<(StatusCode, Json<SuccessResponse<CategoryBody>>), AppError> {
    let category = state.catalog.create_category(&payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::with_data("Category created", CategoryBody { category })),
    ))
}

/// GET /api/admin/categories/{id}
pub async fn admin_get_category(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<SuccessResponse<CategoryBody>>, AppError> {
    let category = state.catalog.get_category(id).await?;
    Ok(Json(SuccessResponse::with_data("Category retrieved", CategoryBody { category })))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<SuccessResponse<CategoryBody>>, AppError> {
    let category = state.catalog.update_category(id, &payload).await?;
    Ok(Json(SuccessResponse::with_data("Category updated", CategoryBody { category })))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete_category(id).await?;
    Ok(Json(MessageResponse::new("Category deleted")))
}
