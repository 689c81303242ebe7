//! 错误类型定义
//!
//! 看板侧的错误在控制器边界被转换为页面内提示，不会继续向上传播

use thiserror::Error as ThisError;

/// 数据获取错误
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// 网络/传输失败
    #[error("{0}")]
    Transport(String),

    /// 非成功 HTTP 状态码
    #[error("Server returned {code}: {reason}")]
    Status { code: u16, reason: String },

    /// 响应体中携带的 error 字段
    #[error("{0}")]
    Payload(String),

    /// 结果为空
    #[error("empty result set")]
    Empty,

    /// 响应体不是合法 JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// 渲染错误
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// 找不到挂载目标
    #[error("target element #{0} not found")]
    MissingTarget(String),

    /// 输出界面写入失败
    #[error("surface error: {0}")]
    Surface(String),
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::Surface(err.to_string())
    }
}

/// 数据文件加载错误
#[derive(ThisError, Debug)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column: {0}")]
    MissingColumn(String),
}
