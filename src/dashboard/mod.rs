//! 指数看板
//!
//! 公司列表、详情卡片和价格走势图。控制器维护界面状态，
//! 通过 [`surface::Surface`] 输出到终端、HTML 页面或内存

pub mod chart;      // 走势图配置
pub mod controller; // 看板控制器
pub mod debug;      // 开发者模式数据结构展示
pub mod detail;     // 详情卡片
pub mod format;     // 数值格式化
pub mod list;       // 公司列表
pub mod render;     // 标记树渲染
pub mod state;      // 界面状态
pub mod surface;    // 输出界面
pub mod view;       // 标记树
