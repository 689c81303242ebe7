use std::collections::BTreeMap;

use super::{has_target, ChartHandle, Panel, Surface};
use crate::dashboard::chart::ChartConfig;
use crate::dashboard::view::Node;
use crate::error::RenderError;

/// 内存中的展示环境
#[derive(Debug, Default)]
pub struct MemorySurface {
    panels: BTreeMap<Panel, Node>,
    charts: BTreeMap<ChartHandle, (String, ChartConfig)>,
    next_chart: u64,
    created: usize,
    destroyed: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, panel: Panel) -> Option<&Node> {
        self.panels.get(&panel)
    }

    /// 面板的纯文本内容，未挂载时为空串
    pub fn panel_text(&self, panel: Panel) -> String {
        self.panel(panel).map(Node::text_content).unwrap_or_default()
    }

    /// 仍然存活的图表实例
    pub fn live_charts(&self) -> Vec<(ChartHandle, &ChartConfig)> {
        self.charts
            .iter()
            .map(|(handle, (_, config))| (*handle, config))
            .collect()
    }

    pub fn created(&self) -> usize {
        self.created
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl Surface for MemorySurface {
    fn mount(&mut self, panel: Panel, node: Node) -> Result<(), RenderError> {
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
        self.next_chart += 1;
        let handle = ChartHandle(self.next_chart);
        self.charts.insert(handle, (canvas_id.to_string(), config.clone()));
        self.created += 1;
        Ok(handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        if self.charts.remove(&handle).is_some() {
            self.destroyed += 1;
        }
    }
}
