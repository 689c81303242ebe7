//! 看板状态

use crate::models::{FieldMap, RawRecord};

/// 请求令牌，单调递增
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// 令牌发放器：只有最新发放的令牌对应的响应才会被采用
#[derive(Debug, Default)]
pub struct TokenIssuer {
    latest: u64,
}

impl TokenIssuer {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// 界面状态，由控制器独占
#[derive(Debug, Default)]
pub struct DashboardState {
    /// 完整公司列表
    pub entities: Vec<String>,
    /// 搜索关键字
    pub filter: String,
    /// 当前选中的公司
    pub selected: Option<String>,
    /// 当前公司的记录序列，最后一条为最新
    pub series: Vec<RawRecord>,
    /// 本批记录的字段映射
    pub fields: FieldMap,
    /// 当前展示的日期，None 表示最新
    pub date: Option<String>,
    pub tokens: TokenIssuer,
}
