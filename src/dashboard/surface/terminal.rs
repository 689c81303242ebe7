use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Widget};

use super::{has_target, ChartHandle, Panel, Surface};
use crate::dashboard::chart::{ChartConfig, CURRENCY};
use crate::dashboard::format::format_value;
use crate::dashboard::render;
use crate::dashboard::view::Node;
use crate::error::RenderError;

/// 终端图表尺寸
const CHART_WIDTH: u16 = 72;
const CHART_HEIGHT: u16 = 14;

/// 终端展示环境：面板以文本形式输出，图表用 ratatui 绘制
pub struct TerminalSurface<W: Write> {
    out: W,
    panels: BTreeMap<Panel, Node>,
    live: BTreeSet<ChartHandle>,
    next_chart: u64,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            panels: BTreeMap::new(),
            live: BTreeSet::new(),
            next_chart: 0,
        }
    }

    /// 直接输出一行提示（不属于任何面板）
    pub fn notice(&mut self, message: &str) -> Result<(), RenderError> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn mount(&mut self, panel: Panel, node: Node) -> Result<(), RenderError> {
        writeln!(self.out, "--- {} ---", panel.name())?;
        writeln!(self.out, "{}", render::text(&node))?;
        self.out.flush()?;
        self.panels.insert(panel, node);
        Ok(())
    }

    fn clear(&mut self, panel: Panel) {
        self.panels.remove(&panel);
    }

    fn create_chart(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError> {
        if !has_target(self.panels.values(), canvas_id) {
            return Err(RenderError::MissingTarget(canvas_id.to_string()));
        }

        for line in plot(config, CHART_WIDTH, CHART_HEIGHT) {
            writeln!(self.out, "{}", line)?;
        }
        self.out.flush()?;

        self.next_chart += 1;
        let handle = ChartHandle(self.next_chart);
        self.live.insert(handle);
        Ok(handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.live.remove(&handle);
    }
}

/// y 轴范围，所有值相同时上下各留 1
fn y_bounds(values: &[f64]) -> [f64; 2] {
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if high > low {
        [low, high]
    } else {
        [low - 1.0, high + 1.0]
    }
}

/// 用 ratatui 折线图绘制为纯文本行，无数据时为空
pub fn plot(config: &ChartConfig, width: u16, height: u16) -> Vec<String> {
    let values = config.values();
    let Some(dataset) = config.data.datasets.first() else {
        return Vec::new();
    };
    if values.is_empty() {
        return Vec::new();
    }

    let points: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
    let [low, high] = y_bounds(values);
    let first = config.data.labels.first().map(String::as_str).unwrap_or("");
    let last = config.data.labels.last().map(String::as_str).unwrap_or("");

    let chart = Chart::new(vec![Dataset::default()
        .name(dataset.label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)])
    .block(Block::default().borders(Borders::ALL).title(config.options.scales.y.title.text.as_str()))
    .x_axis(
        Axis::default()
            .title(config.options.scales.x.title.text.as_str())
            .bounds([0.0, (points.len() - 1).max(1) as f64])
            .labels(vec![Span::raw(first), Span::raw(last)]),
    )
    .y_axis(
        Axis::default().bounds([low, high]).labels(vec![
            Span::raw(format!("{}{}", CURRENCY, format_value(&low))),
            Span::raw(format!("{}{}", CURRENCY, format_value(&high))),
        ]),
    );

    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    chart.render(area, &mut buffer);

    (0..height)
        .map(|y| {
            let line: String = (0..width).map(|x| buffer.get(x, y).symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::view::Element;

    use crate::models::{FieldMap, RawRecord};
    use serde_json::json;

    fn series() -> Vec<RawRecord> {
        vec![
            json!({ "index_date": "2024-01-01", "closing_index_value": 100 }),
            json!({ "index_date": "2024-01-02", "closing_index_value": 103.5 }),
            json!({ "index_date": "2024-01-03", "closing_index_value": 105 }),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn is_braille(c: char) -> bool {
        ('\u{2801}'..='\u{28FF}').contains(&c)
    }

    #[test]
    fn test_plot_line_chart() {
        let series = series();
        let config = ChartConfig::from_series(&series, &FieldMap::detect(&series));
        let lines = plot(&config, CHART_WIDTH, CHART_HEIGHT);

        assert_eq!(lines.len(), CHART_HEIGHT as usize);
        assert!(lines.iter().any(|l| l.chars().any(is_braille)));
        assert!(lines.iter().any(|l| l.contains("2024-01-01")));
        assert!(lines.iter().any(|l| l.contains("₹105.00")));
        assert!(lines.iter().any(|l| l.contains("₹100.00")));
        assert!(lines.iter().all(|l| l.chars().count() <= CHART_WIDTH as usize));
    }

    #[test]
    fn test_plot_flat_and_empty() {
        let series = vec![json!({ "index_date": "2024-01-01", "closing_index_value": 5 })
            .as_object()
            .cloned()
            .unwrap()];
        let config = ChartConfig::from_series(&series, &FieldMap::detect(&series));
        assert_eq!(y_bounds(config.values()), [4.0, 6.0]);
        assert_eq!(plot(&config, CHART_WIDTH, CHART_HEIGHT).len(), CHART_HEIGHT as usize);

        let empty = ChartConfig::from_series(&[], &FieldMap::default());
        assert!(plot(&empty, CHART_WIDTH, CHART_HEIGHT).is_empty());
    }

    #[test]
    fn test_chart_written_after_panel() {
        let series = series();
        let config = ChartConfig::from_series(&series, &FieldMap::detect(&series));
        let mut surface = TerminalSurface::new(Vec::new());
        surface
            .mount(Panel::View, Element::new("canvas").id("price-chart").into())
            .unwrap();
        surface.create_chart("price-chart", &config).unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.starts_with("--- company-view ---\n[chart #price-chart]\n"));
        assert!(out.contains("Price (₹)"));
    }

    #[test]
    fn test_mount_writes_panel_text() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface
            .mount(Panel::List, Element::new("div").class("text-muted").text("No companies found").into())
            .unwrap();
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "--- company-list ---\nNo companies found\n");
    }

    #[test]
    fn test_chart_needs_canvas() {
        let mut surface = TerminalSurface::new(Vec::new());
        let config = ChartConfig::from_series(&[], &Default::default());
        assert_eq!(
            surface.create_chart("price-chart", &config),
            Err(RenderError::MissingTarget("price-chart".to_string()))
        );
    }
}
