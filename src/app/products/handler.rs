//! 商品接口处理器

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::info;
use uuid::Uuid;

use super::{
    model::{Category, Product, ProductPage, ProductStats},
    query::{self, ListQuery, PageWindow, SearchQuery},
    service::ProductStore,
    validation::validate_product,
};
use crate::core::{
    error::AppError,
    response::{ApiPath, ApiQuery, JsonBody, Reject},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
}

impl AppState {
    pub fn new(store: impl ProductStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Response, AppError> {
    let mut products = state.store.list()?;

    if let Some(raw) = params.category.as_deref().filter(|c| !c.is_empty()) {
        let Ok(category) = raw.parse::<Category>() else {
            return Ok(Reject::bad_request("Invalid category").into_response());
        };
        products.retain(|p| p.category == category);
    }

    let window = PageWindow::from_raw(params.page.as_deref(), params.limit.as_deref());
    let (total, products) = query::paginate(
        products,
        params.sort.as_deref(),
        params.order.as_deref(),
        &window,
    );

    Ok(Json(ProductPage {
        total,
        page: window.page,
        limit: window.limit,
        products,
    })
    .into_response())
}

/// GET /api/products/:id
pub async fn get_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Product>, AppError> {
    state
        .store
        .get(&id)?
        .map(Json)
        .ok_or_else(|| AppError::product_not_found(&id))
}

/// POST /api/products
pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let fields = validate_product(&body)?;
    let product = state
        .store
        .insert(fields.into_product(Uuid::new_v4().to_string()))?;

    info!("商品已创建: {} - {}", product.name, product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id
///
/// 整体替换：先确认商品存在，再按创建规则校验全部字段。
pub async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<Product>, AppError> {
    if state.store.get(&id)?.is_none() {
        return Err(AppError::product_not_found(&id));
    }

    let fields = validate_product(&body)?;
    let product = state
        .store
        .replace(&id, fields)?
        .ok_or_else(|| AppError::product_not_found(&id))?;

    info!("商品已更新: {} - {}", product.name, product.id);
    Ok(Json(product))
}

/// DELETE /api/products/:id
pub async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    let product = state
        .store
        .remove(&id)?
        .ok_or_else(|| AppError::product_not_found(&id))?;

    info!("商品已删除: {} - {}", product.name, product.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/products/search
pub async fn search_products(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchQuery>,
) -> Result<Response, AppError> {
    let Some(q) = params.q.filter(|q| !q.is_empty()) else {
        return Ok(
            Reject::bad_request("Search query parameter \"q\" is required").into_response(),
        );
    };

    let results: Vec<Product> = state
        .store
        .list()?
        .into_iter()
        .filter(|p| query::matches_search(p, &q))
        .collect();

    Ok(Json(results).into_response())
}

/// GET /api/products/stats
pub async fn product_stats(State(state): State<AppState>) -> Result<Json<ProductStats>, AppError> {
    let products = state.store.list()?;
    Ok(Json(query::compute_stats(&products)))
}
