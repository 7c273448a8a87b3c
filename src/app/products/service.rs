//! 商品存储服务
//!
//! 处理器只依赖 [`ProductStore`] trait，默认实现 [`MemoryStore`] 把记录按插入顺序
//! 保存在进程内存中，重启后数据重置。

use std::sync::{PoisonError, RwLock};

use thiserror::Error;

use super::model::{Product, ProductFields};

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("商品存储锁已中毒")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 商品存储抽象
pub trait ProductStore: Send + Sync {
    /// 按存储顺序返回全部记录的副本
    fn list(&self) -> StoreResult<Vec<Product>>;

    fn get(&self, id: &str) -> StoreResult<Option<Product>>;

    /// 追加一条记录
    fn insert(&self, product: Product) -> StoreResult<Product>;

    /// 整体替换可变字段，保留 id 和位置；id 不存在时返回 `None`
    fn replace(&self, id: &str, fields: ProductFields) -> StoreResult<Option<Product>>;

    /// 删除记录；id 不存在时返回 `None`
    fn remove(&self, id: &str) -> StoreResult<Option<Product>>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

impl ProductStore for MemoryStore {
    fn list(&self) -> StoreResult<Vec<Product>> {
        Ok(self.products.read()?.clone())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Product>> {
        let products = self.products.read()?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&self, product: Product) -> StoreResult<Product> {
        self.products.write()?.push(product.clone());
        Ok(product)
    }

    fn replace(&self, id: &str, fields: ProductFields) -> StoreResult<Option<Product>> {
        let mut products = self.products.write()?;
        let Some(slot) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        *slot = fields.into_product(slot.id.clone());
        Ok(Some(slot.clone()))
    }

    fn remove(&self, id: &str) -> StoreResult<Option<Product>> {
        let mut products = self.products.write()?;
        let index = products.iter().position(|p| p.id == id);
        Ok(index.map(|index| products.remove(index)))
    }
}
