//! 收盘价折线图
//!
//! 图表配置按 Chart.js 的结构序列化；同一画布上重新绘制前总是先销毁旧实例

use serde::Serialize;

use super::format::format_value;
use super::surface::{ChartHandle, Surface};
use crate::error::RenderError;
use crate::models::{parse_number, CanonicalField, FieldMap, RawRecord};

/// 图表画布 id
pub const CANVAS_ID: &str = "price-chart";
/// 货币符号
pub const CURRENCY: &str = "₹";

const LINE_COLOR: &str = "#4f46e5";
const FILL_COLOR: &str = "rgba(79, 70, 229, 0.3)";

/// 折线图配置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub fill: bool,
    pub tension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

impl Axis {
    fn titled(text: impl Into<String>) -> Self {
        Self {
            title: AxisTitle {
                display: true,
                text: text.into(),
            },
        }
    }
}

/// 悬停提示
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub title: String,
    pub label: String,
}

impl ChartConfig {
    /// 由整段序列构建：x 为日期，y 为收盘值（无法解析时按 0 绘制）
    pub fn from_series(series: &[RawRecord], fields: &FieldMap) -> Self {
        let labels = series
            .iter()
            .map(|record| fields.date_of(record).unwrap_or_default())
            .collect();
        let data = series
            .iter()
            .map(|record| {
                fields
                    .value(record, CanonicalField::Close)
                    .and_then(parse_number)
                    .unwrap_or(0.0)
            })
            .collect();

        Self {
            kind: "line",
            data: ChartData {
                labels,
                datasets: vec![Dataset {
                    label: "Stock Price",
                    data,
                    border_color: LINE_COLOR,
                    background_color: FILL_COLOR,
                    fill: true,
                    tension: 0.4,
                }],
            },
            options: ChartOptions {
                responsive: true,
                scales: Scales {
                    x: Axis::titled("Date"),
                    y: Axis::titled(format!("Price ({})", CURRENCY)),
                },
            },
        }
    }

    /// 第 index 个数据点的悬停提示
    pub fn tooltip(&self, index: usize) -> Option<Tooltip> {
        let label = self.data.labels.get(index)?;
        let value = self.data.datasets.first()?.data.get(index)?;
        Some(Tooltip {
            title: format!("Date: {}", label),
            label: format!("{}{}", CURRENCY, format_value(value)),
        })
    }

    /// 全部数据点的悬停提示
    pub fn tooltips(&self) -> Vec<Tooltip> {
        (0..self.data.labels.len()).filter_map(|index| self.tooltip(index)).collect()
    }

    /// 收盘值序列
    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|dataset| dataset.data.as_slice())
            .unwrap_or(&[])
    }
}

/// 图表视图，持有当前图表实例
#[derive(Debug, Default)]
pub struct ChartView {
    current: Option<ChartHandle>,
}

impl ChartView {
    /// 绘制图表，先销毁已有实例
    pub fn render<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        config: &ChartConfig,
    ) -> Result<ChartHandle, RenderError> {
        self.clear(surface);
        let handle = surface.create_chart(CANVAS_ID, config)?;
        self.current = Some(handle);
        Ok(handle)
    }

    /// 销毁当前实例
    pub fn clear<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(handle) = self.current.take() {
            surface.destroy_chart(handle);
        }
    }
}
