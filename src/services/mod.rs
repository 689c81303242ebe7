//! 业务逻辑服务模块
//!
//! 封装数据获取和数据集查询逻辑

pub mod api_client; // 看板侧 API 客户端
pub mod dataset;    // 数据接口侧 CSV 数据集
