//! 子命令实现

pub mod browse;   // 终端看板
pub mod serve;    // 数据接口服务
pub mod snapshot; // HTML 快照
