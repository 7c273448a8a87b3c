//! 列表查询：分类过滤、排序、分页，以及搜索和统计的计算逻辑
//!
//! 分页参数按原样接收，不做范围校验：越界的页返回空列表，非数字参数得到 NaN 偏移，
//! 按数组切片规则处理（NaN 视为 0，负数从末尾倒数）。

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

use serde::Deserialize;

use super::model::{Product, ProductStats};

const DEFAULT_PAGE: f64 = 1.0;
const DEFAULT_LIMIT: f64 = 10.0;
const DEFAULT_SORT: &str = "name";

/// 列表查询参数（原始字符串）
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// 搜索参数
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// 只有 `desc` 表示降序，其他值一律升序
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Price,
    Category,
    InStock,
    /// 未知字段：所有记录视为相等
    Unknown,
}

impl SortField {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "description" => SortField::Description,
            "price" => SortField::Price,
            "category" => SortField::Category,
            "inStock" => SortField::InStock,
            _ => SortField::Unknown,
        }
    }

    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Description => a.description.cmp(&b.description),
            SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
            SortField::Category => a.category.as_str().cmp(b.category.as_str()),
            SortField::InStock => a.in_stock.cmp(&b.in_stock),
            SortField::Unknown => Ordering::Equal,
        }
    }
}

/// 按字段和方向排序，相等元素之间不保证顺序
pub fn sort_products(products: &mut [Product], field: SortField, order: SortOrder) {
    products.sort_unstable_by(|a, b| match order {
        SortOrder::Asc => field.compare(a, b),
        SortOrder::Desc => field.compare(b, a),
    });
}

/// 解析后的分页窗口
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub start: f64,
    pub end: f64,
    /// 响应中回显的页码，无法解析为整数时为 `None`
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageWindow {
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page_num = page.map_or(DEFAULT_PAGE, to_number);
        let limit_num = limit.map_or(DEFAULT_LIMIT, to_number);

        Self {
            start: (page_num - 1.0) * limit_num,
            end: page_num * limit_num,
            page: page.map_or(Some(DEFAULT_PAGE as i64), parse_leading_int),
            limit: limit.map_or(Some(DEFAULT_LIMIT as i64), parse_leading_int),
        }
    }

    /// 在长度为 `len` 的集合上的切片范围
    pub fn range(&self, len: usize) -> Range<usize> {
        let start = relative_index(self.start, len);
        let end = relative_index(self.end, len);
        if end <= start {
            start..start
        } else {
            start..end
        }
    }
}

/// 数组切片的下标换算：NaN 为 0，向零取整，负数从末尾倒数，结果夹在 `[0, len]`
fn relative_index(value: f64, len: usize) -> usize {
    if value.is_nan() {
        return 0;
    }

    let len_f = len as f64;
    let value = value.trunc();
    let index = if value < 0.0 {
        (len_f + value).max(0.0)
    } else {
        value.min(len_f)
    };
    index as usize
}

/// 字符串转数字：空白串为 0，无法解析为 NaN
pub fn to_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map_or(f64::NAN, |v| v as f64);
    }

    // 排除 Rust 能解析而这里不接受的写法，比如 "inf"、"nan"
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// 取字符串开头的整数部分，如 "2abc" 得到 2；没有数字时为 `None`
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// 列表流程：过滤（已在外层校验分类）、排序、分页
pub fn paginate(
    mut products: Vec<Product>,
    sort: Option<&str>,
    order: Option<&str>,
    window: &PageWindow,
) -> (usize, Vec<Product>) {
    let field = SortField::parse(sort.unwrap_or(DEFAULT_SORT));
    sort_products(&mut products, field, SortOrder::parse(order));

    let total = products.len();
    let range = window.range(total);
    let page = products.drain(range).collect();
    (total, page)
}

/// 名称或描述包含关键字（不区分大小写）
pub fn matches_search(product: &Product, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

/// 汇总统计；没有记录的分类不出现在结果里
pub fn compute_stats(products: &[Product]) -> ProductStats {
    let mut categories = BTreeMap::new();
    for product in products {
        *categories
            .entry(product.category.as_str().to_string())
            .or_insert(0) += 1;
    }

    ProductStats {
        total: products.len(),
        in_stock: products.iter().filter(|p| p.in_stock).count(),
        categories,
    }
}
