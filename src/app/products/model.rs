//! 商品数据模型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 商品分类（固定集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Kitchen,
    Clothing,
    Books,
    Sports,
}

impl Category {
    /// 全部分类，按对外公布的顺序排列
    pub const ALL: [Category; 5] = [
        Category::Electronics,
        Category::Kitchen,
        Category::Clothing,
        Category::Books,
        Category::Sports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Kitchen => "kitchen",
            Category::Clothing => "clothing",
            Category::Books => "books",
            Category::Sports => "sports",
        }
    }

    /// 逗号分隔的分类列表，用于错误提示
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// 商品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub in_stock: bool,
}

/// 商品的可变字段，创建和整体替换时使用
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: Category,
    pub in_stock: bool,
}

impl ProductFields {
    /// 用给定 id 生成完整记录
    pub fn into_product(self, id: impl Into<String>) -> Product {
        Product {
            id: id.into(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            in_stock: self.in_stock,
        }
    }
}

/// 列表接口响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductPage {
    pub total: usize,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub products: Vec<Product>,
}

/// 统计接口响应
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: usize,
    pub in_stock: usize,
    pub categories: std::collections::BTreeMap<String, usize>,
}

/// 启动时预置的三条商品数据
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop".to_string(),
            description: "High-performance laptop with 16GB RAM".to_string(),
            price: 1200.0,
            category: Category::Electronics,
            in_stock: true,
        },
        Product {
            id: "2".to_string(),
            name: "Smartphone".to_string(),
            description: "Latest model with 128GB storage".to_string(),
            price: 800.0,
            category: Category::Electronics,
            in_stock: true,
        },
        Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            description: "Programmable coffee maker with timer".to_string(),
            price: 50.0,
            category: Category::Kitchen,
            in_stock: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("kitchen".parse::<Category>(), Ok(Category::Kitchen));
        assert!("Kitchen".parse::<Category>().is_err());
        assert!("toys".parse::<Category>().is_err());
    }

    #[test]
    fn test_product_json_shape() {
        let product = &seed_products()[0];
        let value = serde_json::to_value(product).unwrap();
        assert_eq!(value["inStock"], true);
        assert_eq!(value["category"], "electronics");
        assert!(value.get("in_stock").is_none());
    }

    #[test]
    fn test_allowed_list() {
        assert_eq!(
            Category::allowed_list(),
            "electronics, kitchen, clothing, books, sports"
        );
    }
}
