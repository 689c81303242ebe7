//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，命令行参数可覆盖其中的字段

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件搜索路径（按顺序）
const CONFIG_PATHS: [&str; 2] = ["config.json", "config/config.json"];

/// 数据接口服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
    /// 指数数据 CSV 文件
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

/// 远程 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API 根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 看板配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 开发者模式：加载数据后展示字段结构
    #[serde(default)]
    pub developer_mode: bool,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据接口服务配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 远程 API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 看板配置
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 5000 }
fn default_data_file() -> PathBuf { PathBuf::from("dump.csv") }
fn default_base_url() -> String { "http://localhost:5000".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            data_file: default_data_file(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 指定路径时必须可读且合法；否则依次搜索默认路径，都不存在则使用默认值。
    /// 返回实际使用的文件路径，便于日志系统初始化后再记录。
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)
                .map_err(|e| anyhow::anyhow!("加载配置文件 {} 失败: {}", path.display(), e))?;
            return Ok((config, Some(path.to_path_buf())));
        }

        for path in CONFIG_PATHS {
            let path = Path::new(path);
            if path.exists() {
                let config = Self::from_file(path)
                    .map_err(|e| anyhow::anyhow!("加载配置文件 {} 失败: {}", path.display(), e))?;
                return Ok((config, Some(path.to_path_buf())));
            }
        }

        Ok((Self::default(), None))
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert_eq!(config.server.data_file, PathBuf::from("dump.csv"));
        assert!(!config.dashboard.developer_mode);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "api": {{ "base_url": "http://example.test:9000" }}, "dashboard": {{ "developer_mode": true }} }}"#
        )
        .unwrap();

        let (config, used) = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(used.as_deref(), Some(file.path()));
        assert_eq!(config.api.base_url, "http://example.test:9000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.log.level, "info");
        assert!(config.dashboard.developer_mode);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(AppConfig::from_file(file.path()).is_err());
    }
}
