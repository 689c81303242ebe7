//! 数据接口响应模型
//!
//! 与看板端约定的 JSON 结构

use serde::{Deserialize, Serialize};

/// 公司列表响应
#[derive(Debug, Serialize, Deserialize)]
pub struct CompaniesBody {
    pub companies: Vec<String>,
}

/// 错误响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthBody {
    pub status: String,
}
