//! 商品模块

pub mod handler;
pub mod model;
pub mod query;
pub mod service;
pub mod validation;

use axum::{routing::get, Router};

use super::route_not_found;
use handler::AppState;

/// 商品路由，合并到 `/api` 路由下
///
/// `search`、`stats` 是静态路径段，优先于 `:id` 匹配。集合路径带不带结尾的 `/` 都可访问，
/// 不支持的方法与未匹配路径一样返回 404。
pub fn routes() -> Router<AppState> {
    let collection = get(handler::list_products)
        .post(handler::create_product)
        .fallback(route_not_found);

    Router::new()
        .route("/products", collection.clone())
        .route("/products/", collection)
        .route(
            "/products/search",
            get(handler::search_products).fallback(route_not_found),
        )
        .route(
            "/products/stats",
            get(handler::product_stats).fallback(route_not_found),
        )
        .route(
            "/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product)
                .fallback(route_not_found),
        )
}
