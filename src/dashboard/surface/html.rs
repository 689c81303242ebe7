use std::collections::BTreeMap;

use chrono::Utc;
use chrono_tz::Asia::Kolkata;
use serde::Serialize;

use super::{has_target, ChartHandle, Panel, Surface};
use crate::dashboard::chart::{ChartConfig, Tooltip};
use crate::dashboard::detail::DATE_SELECT_ID;
use crate::dashboard::render;
use crate::dashboard::view::{Element, Node};
use crate::error::RenderError;

const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; margin: 2rem; color: #1f2937; }
.company-item { padding: .25rem .5rem; }
.company-item.active { background: #eef2ff; font-weight: 600; }
.current-price { font-size: 2rem; font-weight: 700; }
.price-positive { color: #16a34a; }
.price-negative { color: #dc2626; }
.price-neutral { color: #6b7280; }
.stats-cards { display: flex; gap: 1rem; margin-top: 1rem; }
.stat-card { border: 1px solid #e5e7eb; border-radius: .5rem; padding: .75rem 1rem; }
.stat-title { font-size: .8rem; color: #6b7280; }
.alert { padding: .75rem 1rem; border-radius: .5rem; background: #fef3c7; }
.alert-danger { background: #fee2e2; }
.debug-content { white-space: pre; font-family: monospace; }
";

/// 获取印度标准时间字符串（ISO 8601 格式，带+05:30时区）
fn get_ist_time() -> String {
    Utc::now().with_timezone(&Kolkata).to_rfc3339()
}

#[derive(Serialize)]
struct ChartMount<'a> {
    canvas: &'a str,
    config: &'a ChartConfig,
    tooltips: Vec<Tooltip>,
}

/// 页面脚本：绘制图表；切换日期时换上预先渲染的详情并重绘
const SCRIPT: &str = "\
const instances = {};
function draw({ canvas, config, tooltips }) {
  if (instances[canvas]) instances[canvas].destroy();
  const element = document.getElementById(canvas);
  if (!element) return;
  const options = JSON.parse(JSON.stringify(config));
  options.options.plugins = { tooltip: { callbacks: {
    title: (items) => tooltips[items[0].dataIndex].title,
    label: (context) => tooltips[context.dataIndex].label,
  } } };
  instances[canvas] = new Chart(element.getContext('2d'), options);
}
function bindDates() {
  const select = document.getElementById(DATE_SELECT);
  if (!select) return;
  select.addEventListener('change', () => {
    const html = views[select.value];
    if (html === undefined) return;
    document.getElementById(VIEW_PANEL).innerHTML = html;
    charts.forEach(draw);
    bindDates();
  });
}
charts.forEach(draw);
bindDates();
";

/// 收集面板与图表，最终导出为独立 HTML 页面
#[derive(Debug, Default)]
pub struct HtmlSurface {
    panels: BTreeMap<Panel, Node>,
    charts: BTreeMap<ChartHandle, (String, ChartConfig)>,
    next_chart: u64,
    dated_views: BTreeMap<String, Node>,
}

impl HtmlSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先渲染某一日期的详情，页面中切换日期时直接替换
    pub fn add_dated_view(&mut self, date: &str, node: Node) {
        self.dated_views.insert(date.to_string(), node);
    }

    /// 导出页面
    pub fn into_document(self, title: &str) -> Result<String, RenderError> {
        let body = Element::new("div")
            .class("container")
            .children(Panel::ALL.iter().map(|panel| {
                let container = Element::new("div").id(panel.name());
                match self.panels.get(panel) {
                    Some(node) => container.child(node.clone()),
                    None => container,
                }
            }))
            .child(Element::new("footer").text(format!("Generated {}", get_ist_time())));

        let mounts: Vec<ChartMount> = self
            .charts
            .values()
            .map(|(canvas, config)| ChartMount {
                canvas,
                config,
                tooltips: config.tooltips(),
            })
            .collect();
        let views: BTreeMap<&str, String> = self
            .dated_views
            .iter()
            .map(|(date, node)| (date.as_str(), render::html(node)))
            .collect();

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
<script src=\"{cdn}\"></script>\n<style>\n{style}</style>\n</head>\n<body>\n{body}\n<script>\n\
const DATE_SELECT = {select};\nconst VIEW_PANEL = {panel};\nconst charts = {charts};\nconst views = {views};\n\
{script}</script>\n</body>\n</html>\n",
            title = render::escape(title),
            cdn = CHART_JS_CDN,
            style = STYLE,
            body = render::html(&body.into()),
            select = script_json(&DATE_SELECT_ID)?,
            panel = script_json(&Panel::View.name())?,
            charts = script_json(&mounts)?,
            views = script_json(&views)?,
            script = SCRIPT,
        ))
    }
}

/// 序列化为可直接嵌入 <script> 的 JSON
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|e| RenderError::Surface(e.to_string()))
}

impl Surface for HtmlSurface {
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
        Ok(handle)
    }

    fn destroy_chart(&mut self, handle: ChartHandle) {
        self.charts.remove(&handle);
    }
}
