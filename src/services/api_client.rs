//! 指数数据 API 客户端
//!
//! 对接数据接口：
//! - GET {base}/companies
//! - GET {base}/company/{name}
//! - GET {base}/company/{name}/{date}
//!
//! 请求失败不重试，错误统一转换为 [`FetchError`]

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;

/// 看板的数据来源
///
/// 返回原始 JSON，响应体的归一化由调用方完成
pub trait DataSource {
    /// 获取公司列表
    fn entities(&self) -> impl Future<Output = Result<Value, FetchError>> + Send;

    /// 获取公司的全部记录，指定日期时只取该日
    fn series(
        &self,
        entity: &str,
        date: Option<&str>,
    ) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

/// 基于 reqwest 的 API 客户端
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("API 地址 {} 无效: {}", config.base_url, e))?;
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("API 地址 {} 不能作为根地址", config.base_url));
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// 公司列表地址
    pub fn companies_url(&self) -> Result<Url, FetchError> {
        self.endpoint(&["companies"])
    }

    /// 公司记录地址，名称和日期按路径段进行百分号编码
    pub fn company_url(&self, entity: &str, date: Option<&str>) -> Result<Url, FetchError> {
        match date {
            Some(date) => self.endpoint(&["company", entity, date]),
            None => self.endpoint(&["company", entity]),
        }
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("无效的 API 地址: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json(&self, url: Url) -> Result<Value, FetchError> {
        log::debug!("请求 {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("请求 {} 失败: {}", url, status);
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

impl DataSource for ApiClient {
    async fn entities(&self) -> Result<Value, FetchError> {
        let url = self.companies_url()?;
        self.get_json(url).await
    }

    async fn series(&self, entity: &str, date: Option<&str>) -> Result<Value, FetchError> {
        let url = self.company_url(entity, date)?;
        self.get_json(url).await
    }
}
