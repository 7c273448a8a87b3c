//! 创建/更新请求体校验
//!
//! 请求体按原始 JSON 接收，按以下顺序校验：必填字段 → 价格 → 分类 → 字段类型。
//! 必填字段按真值判断，`null`、`false`、`0`、空字符串都算缺失。

use serde_json::{Map, Value};

use super::model::{Category, ProductFields};
use crate::core::error::AppError;

const REQUIRED_FIELDS: [&str; 4] = ["name", "description", "price", "category"];

static NULL: Value = Value::Null;

/// JSON 值的真值判断
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn field<'a>(body: &'a Map<String, Value>, key: &str) -> &'a Value {
    body.get(key).unwrap_or(&NULL)
}

/// 校验请求体并转换为商品字段
pub fn validate_product(body: &Value) -> Result<ProductFields, AppError> {
    let empty = Map::new();
    let body = body.as_object().unwrap_or(&empty);

    if !REQUIRED_FIELDS
        .iter()
        .all(|key| is_truthy(field(body, key)))
    {
        return Err(AppError::Validation("Missing required fields".to_string()));
    }

    let price = match field(body, "price").as_f64() {
        Some(price) if price > 0.0 => price,
        _ => {
            return Err(AppError::Validation(
                "Price must be a positive number".to_string(),
            ))
        }
    };

    let category = field(body, "category")
        .as_str()
        .and_then(|raw| raw.parse::<Category>().ok())
        .ok_or_else(|| {
            AppError::Validation(format!(
                "Category must be one of: {}",
                Category::allowed_list()
            ))
        })?;

    let (Some(name), Some(description)) = (
        field(body, "name").as_str(),
        field(body, "description").as_str(),
    ) else {
        return Err(AppError::Validation(
            "Name and description must be strings".to_string(),
        ));
    };

    Ok(ProductFields {
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        in_stock: is_truthy(field(body, "inStock")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<ProductFields, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_body() {
        let fields = validate_product(&json!({
            "name": "Desk Lamp",
            "description": "LED lamp",
            "price": 24.5,
            "category": "electronics",
            "inStock": true
        }))
        .unwrap();

        assert_eq!(fields.name, "Desk Lamp");
        assert_eq!(fields.price, 24.5);
        assert_eq!(fields.category, Category::Electronics);
        assert!(fields.in_stock);
    }

    #[test]
    fn test_in_stock_defaults_to_false() {
        let fields = validate_product(&json!({
            "name": "Mug",
            "description": "Ceramic",
            "price": 8,
            "category": "kitchen"
        }))
        .unwrap();
        assert!(!fields.in_stock);

        let fields = validate_product(&json!({
            "name": "Mug",
            "description": "Ceramic",
            "price": 8,
            "category": "kitchen",
            "inStock": "yes"
        }))
        .unwrap();
        assert!(fields.in_stock);
    }

    #[test]
    fn test_missing_fields() {
        let msg = message(validate_product(&json!({
            "name": "",
            "description": "x",
            "price": 5,
            "category": "books"
        })));
        assert_eq!(msg, "Missing required fields");

        // 价格为 0 同样视为缺失
        let msg = message(validate_product(&json!({
            "name": "x",
            "description": "x",
            "price": 0,
            "category": "books"
        })));
        assert_eq!(msg, "Missing required fields");

        let msg = message(validate_product(&json!([1, 2, 3])));
        assert_eq!(msg, "Missing required fields");
    }

    #[test]
    fn test_price_rules() {
        for price in [json!(-3), json!("12"), json!(true)] {
            let msg = message(validate_product(&json!({
                "name": "x",
                "description": "x",
                "price": price,
                "category": "books"
            })));
            assert_eq!(msg, "Price must be a positive number");
        }
    }

    #[test]
    fn test_category_rules() {
        let msg = message(validate_product(&json!({
            "name": "x",
            "description": "x",
            "price": 3,
            "category": "toys"
        })));
        assert_eq!(
            msg,
            "Category must be one of: electronics, kitchen, clothing, books, sports"
        );
    }

    #[test]
    fn test_non_string_name() {
        let msg = message(validate_product(&json!({
            "name": 42,
            "description": "x",
            "price": 3,
            "category": "books"
        })));
        assert_eq!(msg, "Name and description must be strings");
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
