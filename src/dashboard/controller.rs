//! 看板控制器
//!
//! 流程：加载公司列表 → 用户选择 → 加载记录 → 字段映射 → 渲染详情 →（可选）切换日期，
//! 切换日期只使用已缓存的记录，不重新请求。
//!
//! 所有错误都在这里转换为面板内提示并写入日志，不向调用方传播

use serde_json::Value;

use super::chart::{ChartConfig, ChartView};
use super::debug::render_structure;
use super::detail;
use super::list::{filter_entities, render_list, render_list_error};
use super::state::{DashboardState, RequestToken};
use super::surface::{Panel, Surface};
use super::view::Node;
use crate::error::{FetchError, RenderError};
use crate::models::{entity_names, series_records, FieldMap};
use crate::services::api_client::DataSource;

/// 一次记录请求
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub token: RequestToken,
    pub entity: String,
    pub date: Option<String>,
}

/// 看板控制器
pub struct DashboardController<S: Surface> {
    state: DashboardState,
    surface: S,
    chart: ChartView,
    developer_mode: bool,
}

impl<S: Surface> DashboardController<S> {
    pub fn new(surface: S, developer_mode: bool) -> Self {
        Self {
            state: DashboardState::default(),
            surface,
            chart: ChartView::default(),
            developer_mode,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    // ==================== 公司列表 ====================

    /// 获取并渲染公司列表
    pub async fn load_entities<D: DataSource>(&mut self, source: &D) {
        let result = source.entities().await;
        self.apply_entities(result);
    }

    /// 处理公司列表响应
    pub fn apply_entities(&mut self, result: Result<Value, FetchError>) {
        match result {
            Ok(payload) => {
                self.state.entities = entity_names(payload);
                log::info!("加载公司列表成功，共 {} 家", self.state.entities.len());
                self.render_list();
            }
            Err(e) => {
                log::error!("加载公司列表失败: {}", e);
                self.mount(Panel::List, render_list_error(&e.to_string()));
            }
        }
    }

    /// 更新搜索关键字，只在已获取的列表上过滤
    pub fn set_filter(&mut self, query: &str) {
        self.state.filter = query.to_string();
        self.render_list();
    }

    /// 当前过滤后可见的公司
    pub fn visible_entities(&self) -> Vec<&String> {
        filter_entities(&self.state.entities, &self.state.filter)
    }

    fn render_list(&mut self) {
        let node = {
            let visible = self.visible_entities();
            render_list(
                &visible,
                self.state.entities.len(),
                &self.state.filter,
                self.state.selected.as_deref(),
            )
        };
        self.mount(Panel::List, node);
    }

    // ==================== 记录加载 ====================

    /// 选中公司并开始一次记录请求
    ///
    /// 发放新的令牌，之前未完成的请求随之作废
    pub fn begin_series(&mut self, entity: &str, date: Option<&str>) -> SeriesRequest {
        self.state.selected = Some(entity.to_string());
        self.state.date = None;
        self.state.series.clear();
        self.state.fields = FieldMap::default();
        let token = self.state.tokens.issue();

        self.render_list();
        self.surface.clear(Panel::Debug);
        self.show_message(detail::loading(entity, date));

        SeriesRequest {
            token,
            entity: entity.to_string(),
            date: date.map(str::to_string),
        }
    }

    /// 处理记录响应，过期响应直接丢弃，返回是否被采用
    pub fn apply_series(&mut self, request: SeriesRequest, result: Result<Value, FetchError>) -> bool {
        if !self.state.tokens.is_current(request.token) {
            log::debug!("丢弃过期响应: {} ({:?})", request.entity, request.token);
            return false;
        }

        let entity = request.entity.as_str();
        let date = request.date.as_deref();
        match result.and_then(series_records) {
            Ok(records) => {
                log::info!("{} 加载 {} 条记录", entity, records.len());
                self.state.fields = FieldMap::detect(&records);
                self.state.series = records;

                if self.developer_mode {
                    if let Some(node) = render_structure(&self.state.series) {
                        self.mount(Panel::Debug, node);
                    }
                }
                self.render_detail(None);
            }
            Err(FetchError::Payload(message)) => {
                log::warn!("{} 返回错误: {}", entity, message);
                self.show_message(detail::payload_error(&message));
            }
            Err(FetchError::Empty) => {
                log::warn!("{} 无数据", entity);
                self.show_message(detail::no_data(entity, date));
            }
            Err(e) => {
                log::error!("加载 {} 数据失败: {}", entity, e);
                self.show_message(detail::load_error(entity, date, &e.to_string()));
            }
        }
        true
    }

    /// 选中公司并加载记录
    pub async fn load_series<D: DataSource>(&mut self, source: &D, entity: &str, date: Option<&str>) {
        let request = self.begin_series(entity, date);
        let result = source.series(&request.entity, request.date.as_deref()).await;
        self.apply_series(request, result);
    }

    // ==================== 详情渲染 ====================

    /// 切换展示日期，使用已缓存的记录
    pub fn pick_date(&mut self, date: &str) {
        self.render_detail(Some(date));
    }

    /// 渲染详情，未指定日期时展示最新记录
    pub fn render_detail(&mut self, date: Option<&str>) {
        let entity = self.state.selected.clone().unwrap_or_default();
        if self.state.series.is_empty() {
            log::warn!("{} 尚无记录，无法渲染详情", entity);
            self.show_message(detail::no_data(&entity, None));
            return;
        }

        match detail::render_detail(&entity, &self.state.series, &self.state.fields, date) {
            Ok(node) => {
                self.state.date = date.map(str::to_string);
                if let Err(e) = self.mount_detail(node) {
                    log::error!("渲染 {} 详情失败: {}", entity, e);
                    self.show_message(detail::render_error(&e.to_string()));
                }
            }
            Err(warning) => {
                log::warn!("{} 在 {} 无数据", entity, date.unwrap_or("-"));
                self.show_message(warning);
            }
        }
    }

    fn mount_detail(&mut self, node: Node) -> Result<(), RenderError> {
        self.surface.mount(Panel::View, node)?;
        let config = ChartConfig::from_series(&self.state.series, &self.state.fields);
        self.chart.render(&mut self.surface, &config)?;
        Ok(())
    }

    /// 用提示替换详情面板，同时销毁图表
    fn show_message(&mut self, node: Node) {
        self.chart.clear(&mut self.surface);
        self.mount(Panel::View, node);
    }

    fn mount(&mut self, panel: Panel, node: Node) {
        if let Err(e) = self.surface.mount(panel, node) {
            log::error!("挂载 {} 失败: {}", panel.name(), e);
        }
    }
}
