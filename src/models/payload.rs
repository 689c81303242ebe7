//! 接口响应体归一化
//!
//! 公司列表既可能是裸数组，也可能包在 `companies` 字段里；
//! 记录接口可能返回数组、单个对象，或 `{ "error": ... }`

use serde_json::Value;

use super::RawRecord;
use crate::error::FetchError;

/// 解析公司列表响应
pub fn entity_names(payload: Value) -> Vec<String> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("companies") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(name) => Some(name),
            other => {
                log::warn!("忽略非字符串的公司名称: {}", other);
                None
            }
        })
        .collect()
}

/// 解析记录响应，统一为记录序列
pub fn series_records(payload: Value) -> Result<Vec<RawRecord>, FetchError> {
    let items = match payload {
        Value::Array(items) => items,
        Value::Object(map) => {
            if let Some(error) = map.get("error").filter(|e| is_truthy(e)) {
                let message = match error {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                return Err(FetchError::Payload(message));
            }
            vec![Value::Object(map)]
        }
        Value::Null => Vec::new(),
        other => {
            log::warn!("无法识别的记录响应: {}", other);
            Vec::new()
        }
    };

    let records: Vec<RawRecord> = items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map),
            other => {
                log::warn!("忽略非对象记录: {}", other);
                None
            }
        })
        .collect();

    if records.is_empty() {
        return Err(FetchError::Empty);
    }
    Ok(records)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        _ => true,
    }
}
