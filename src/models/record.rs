//! 指数记录模型
//!
//! 接口返回的记录字段名并不统一（如 `open` 与 `opening_price`），
//! 这里把它们解析到一组固定的规范字段上

use serde_json::{Map, Value};

/// 接口返回的原始记录，字段名 → 值
pub type RawRecord = Map<String, Value>;

/// 缺失或无法解析的数值的占位文本
pub const NO_DATA: &str = "No Data";

/// 规范字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Date,
    Open,
    Close,
    High,
    Low,
    Volume,
    PointsChange,
    ChangePercent,
    PbRatio,
    PeRatio,
    DivYield,
    Turnover,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 12] = [
        CanonicalField::Date,
        CanonicalField::Open,
        CanonicalField::Close,
        CanonicalField::High,
        CanonicalField::Low,
        CanonicalField::Volume,
        CanonicalField::PointsChange,
        CanonicalField::ChangePercent,
        CanonicalField::PbRatio,
        CanonicalField::PeRatio,
        CanonicalField::DivYield,
        CanonicalField::Turnover,
    ];

    /// 候选字段名，靠前者优先
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Date => &["index_date", "date", "timestamp"],
            CanonicalField::Open => &["open_index_value", "open", "opening_price", "start"],
            CanonicalField::Close => &["closing_index_value", "close", "closing_price", "end"],
            CanonicalField::High => &["high_index_value", "high", "highest_price", "max"],
            CanonicalField::Low => &["low_index_value", "low", "lowest_price", "min"],
            CanonicalField::Volume => &["volume", "trading_volume", "vol"],
            CanonicalField::PointsChange => &["points_change", "change", "price_change"],
            CanonicalField::ChangePercent => &["change_percent", "percent_change", "pct_change"],
            CanonicalField::PbRatio => &["pb_ratio", "pb"],
            CanonicalField::PeRatio => &["pe_ratio", "pe"],
            CanonicalField::DivYield => &["div_yield", "dividend_yield"],
            CanonicalField::Turnover => &["turnover_rs_cr", "turnover"],
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// 一批记录的字段映射：每个规范字段实际对应的字段名
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    resolved: [Option<&'static str>; 12],
}

impl FieldMap {
    /// 检测一批记录的字段映射
    ///
    /// 以第一条记录为准，靠前的候选优先；第一条记录里完全缺失的字段再按顺序查看后续记录。
    pub fn detect(records: &[RawRecord]) -> Self {
        let mut map = FieldMap::default();
        for field in CanonicalField::ALL {
            map.resolved[field.slot()] = records.iter().find_map(|record| {
                field
                    .candidates()
                    .iter()
                    .copied()
                    .find(|name| record.contains_key(*name))
            });
        }
        map
    }

    /// 规范字段对应的实际字段名
    pub fn name(&self, field: CanonicalField) -> Option<&'static str> {
        self.resolved[field.slot()]
    }

    /// 取出记录中某个规范字段的原始值
    pub fn value<'a>(&self, record: &'a RawRecord, field: CanonicalField) -> Option<&'a Value> {
        self.name(field).and_then(|name| record.get(name))
    }

    /// 记录的日期标签
    pub fn date_of(&self, record: &RawRecord) -> Option<String> {
        self.value(record, CanonicalField::Date).and_then(value_label)
    }
}

/// 把 JSON 值转为展示用标签，null 视为缺失
pub fn value_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 宽松地把 JSON 值解析为有限浮点数
///
/// 数字和去除空白后可解析的数字字符串有效；null、布尔、空串、"No Data"、
/// 非数字字符串以及 NaN/inf 一律返回 None。
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// 规范化后的单日记录
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    pub date: Option<String>,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
    pub points_change: Option<f64>,
    pub change_percent: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub div_yield: Option<f64>,
    pub turnover: Option<f64>,
}

impl CanonicalRecord {
    pub fn from_raw(record: &RawRecord, fields: &FieldMap) -> Self {
        let number = |field| fields.value(record, field).and_then(parse_number);
        Self {
            date: fields.date_of(record),
            open: number(CanonicalField::Open),
            close: number(CanonicalField::Close),
            high: number(CanonicalField::High),
            low: number(CanonicalField::Low),
            volume: number(CanonicalField::Volume),
            points_change: number(CanonicalField::PointsChange),
            change_percent: number(CanonicalField::ChangePercent),
            pb_ratio: number(CanonicalField::PbRatio),
            pe_ratio: number(CanonicalField::PeRatio),
            div_yield: number(CanonicalField::DivYield),
            turnover: number(CanonicalField::Turnover),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_detect_prefers_earlier_candidate() {
        let records = vec![record(json!({
            "close": 1.0,
            "closing_index_value": 2.0,
            "date": "2024-01-01",
            "index_date": "2024-01-02",
        }))];
        let fields = FieldMap::detect(&records);
        assert_eq!(fields.name(CanonicalField::Close), Some("closing_index_value"));
        assert_eq!(fields.name(CanonicalField::Date), Some("index_date"));
        assert_eq!(fields.name(CanonicalField::Volume), None);
    }

    #[test]
    fn test_detect_alternate_naming() {
        let records = vec![record(json!({
            "timestamp": "2024-03-01",
            "opening_price": "10",
            "closing_price": "11",
            "max": 12,
            "min": 9,
            "trading_volume": 5000,
        }))];
        let fields = FieldMap::detect(&records);
        assert_eq!(fields.name(CanonicalField::Date), Some("timestamp"));
        assert_eq!(fields.name(CanonicalField::Open), Some("opening_price"));
        assert_eq!(fields.name(CanonicalField::High), Some("max"));
        assert_eq!(fields.name(CanonicalField::Volume), Some("trading_volume"));

        let canonical = CanonicalRecord::from_raw(&records[0], &fields);
        assert_eq!(canonical.date.as_deref(), Some("2024-03-01"));
        assert_eq!(canonical.close, Some(11.0));
        assert_eq!(canonical.low, Some(9.0));
        assert_eq!(canonical.pe_ratio, None);
    }

    #[test]
    fn test_detect_falls_back_to_later_records() {
        let records = vec![
            record(json!({ "index_date": "2024-01-01" })),
            record(json!({ "index_date": "2024-01-02", "pe_ratio": 20.5 })),
        ];
        let fields = FieldMap::detect(&records);
        assert_eq!(fields.name(CanonicalField::PeRatio), Some("pe_ratio"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(&json!(12.5)), Some(12.5));
        assert_eq!(parse_number(&json!(" 105 ")), Some(105.0));
        assert_eq!(parse_number(&json!("1e3")), Some(1000.0));
        assert_eq!(parse_number(&json!("No Data")), None);
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!("inf")), None);
        assert_eq!(parse_number(&Value::Null), None);
        assert_eq!(parse_number(&json!(true)), None);
    }

    #[test]
    fn test_numeric_date_label() {
        let records = vec![record(json!({ "date": 20240101 }))];
        let fields = FieldMap::detect(&records);
        assert_eq!(fields.date_of(&records[0]).as_deref(), Some("20240101"));
    }
}
