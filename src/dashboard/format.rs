//! 数值格式化
//!
//! 所有函数都是纯函数，对任意 JSON 值都有定义：
//! 无法解析的值一律显示为 "No Data"，不会出现 NaN

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::models::{parse_number, NO_DATA};

/// 可格式化的数值：原始 JSON 值或已解析的数字
pub trait Numeric {
    /// 有限数值，无法解析时为 None
    fn number(&self) -> Option<f64>;
}

impl Numeric for Value {
    fn number(&self) -> Option<f64> {
        parse_number(self)
    }
}

impl Numeric for f64 {
    fn number(&self) -> Option<f64> {
        Some(*self).filter(|v| v.is_finite())
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn number(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::number)
    }
}

/// 价格、比率：保留两位小数，0.5 进位远离零，负零显示为 0.00
pub fn format_value<N: Numeric + ?Sized>(value: &N) -> String {
    let Some(v) = value.number() else {
        return NO_DATA.to_string();
    };
    let v = v + 0.0;

    // 按二进制精确值舍入
    match Decimal::from_f64_retain(v) {
        Some(d) => {
            let mut rounded = d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(2);
            rounded.to_string()
        }
        None => format!("{:.2}", v),
    }
}

/// 成交量、成交额：en-US 千分位格式，最多保留三位小数并去掉末尾的 0
pub fn format_int<N: Numeric + ?Sized>(value: &N) -> String {
    let Some(v) = value.number() else {
        return NO_DATA.to_string();
    };

    // 按最短十进制表示舍入
    let digits = match v.abs().to_string().parse::<Decimal>() {
        Ok(d) => d
            .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
            .to_string(),
        Err(_) => format!("{:.3}", v.abs()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if v < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// 涨跌方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
    /// 涨跌额为 "No Data" 时不显示
    Hidden,
}

impl Trend {
    /// 由格式化后的涨跌额判断方向
    pub fn of(formatted_change: &str) -> Self {
        if formatted_change == NO_DATA {
            return Trend::Hidden;
        }
        match formatted_change.parse::<f64>() {
            Ok(v) if v >= 0.0 => Trend::Positive,
            Ok(_) => Trend::Negative,
            Err(_) => Trend::Hidden,
        }
    }

    pub fn marker(self) -> Option<&'static str> {
        match self {
            Trend::Positive => Some("▲"),
            Trend::Negative => Some("▼"),
            Trend::Hidden => None,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            Trend::Positive => "price-positive",
            Trend::Negative => "price-negative",
            Trend::Hidden => "price-neutral",
        }
    }
}
