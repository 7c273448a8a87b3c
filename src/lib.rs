//! # 商品管理 API
//!
//! 基于 Axum 的内存商品 CRUD 服务，提供：
//! - 分类过滤、排序、分页的商品列表
//! - 商品的创建、查询、整体更新和删除
//! - 名称/描述关键字搜索与统计
//! - `/api` 路径下的 API Key 认证和按客户端限流
//!
//! 数据只保存在进程内存中，重启后恢复为预置的三条商品。

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_router, seeded_state};
pub use config::{Config, ConfigError};
pub use crate::core::error::AppError;
