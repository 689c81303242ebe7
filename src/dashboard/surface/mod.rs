//! 输出界面
//!
//! 控制器只通过 [`Surface`] 与展示环境交互：挂载面板、创建和销毁图表实例。
//!
//! - `MemorySurface`：内存实现，仅用于测试
//! - [`TerminalSurface`]：终端输出
//! - [`HtmlSurface`]：导出静态 HTML 页面

mod html;
#[cfg(test)]
mod memory;
mod terminal;

pub use html::HtmlSurface;
#[cfg(test)]
pub use memory::MemorySurface;
pub use terminal::TerminalSurface;

use super::chart::ChartConfig;
use super::view::Node;
use crate::error::RenderError;

/// 面板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Panel {
    /// 公司列表
    List,
    /// 详情视图
    View,
    /// 开发者模式下的数据结构
    Debug,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::List, Panel::View, Panel::Debug];

    pub fn name(self) -> &'static str {
        match self {
            Panel::List => "company-list",
            Panel::View => "company-view",
            Panel::Debug => "debug-view",
        }
    }
}

/// 图表实例句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChartHandle(pub u64);

/// 展示环境
pub trait Surface {
    /// 用新内容替换面板
    fn mount(&mut self, panel: Panel, node: Node) -> Result<(), RenderError>;

    /// 清空面板
    fn clear(&mut self, panel: Panel);

    /// 在已挂载的画布上创建图表，找不到画布时返回 [`RenderError::MissingTarget`]
    fn create_chart(&mut self, canvas_id: &str, config: &ChartConfig) -> Result<ChartHandle, RenderError>;

    /// 销毁图表实例
    fn destroy_chart(&mut self, handle: ChartHandle);
}

/// 已挂载面板中是否存在指定 id 的元素
pub(crate) fn has_target<'a, I>(panels: I, id: &str) -> bool
where
    I: IntoIterator<Item = &'a Node>,
{
    panels.into_iter().any(|node| node.find_by_id(id).is_some())
}
