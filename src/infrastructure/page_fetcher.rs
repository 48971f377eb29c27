//! 页面抓取器 - 基础设施层
//!
//! 持有唯一的 HTTP 客户端，只暴露"按页码取一页"的能力

use std::future::Future;

use encoding_rs::Encoding;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, DecodeError, FetchError, PageError};
use crate::models::{PageIndex, RawPage};

/// 每页固定条数
pub const PAGE_SIZE: usize = 10;

/// 页面来源
///
/// 引擎只依赖这个能力，测试里可以换成内存实现
pub trait PageSource: Send + Sync {
    /// 取第 `index` 页并解码成文本
    fn fetch(&self, index: PageIndex) -> impl Future<Output = Result<RawPage, PageError>> + Send;
}

/// 基于 reqwest 的页面抓取器
///
/// 职责：
/// - 持有共享的 Client（内部连接池，clone 代价很低）
/// - 根据页码拼出请求 URL
/// - 按固定的单字节编码解码响应体
/// - 不认识表格，不关心分页何时结束
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
    encoding: &'static Encoding,
}

impl PageFetcher {
    /// 根据配置创建抓取器
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(ConfigError::HttpClient)?;
        Self::with_client(client, &config.base_url, &config.encoding)
    }

    /// 使用已有的 Client 创建
    pub fn with_client(client: Client, base_url: &str, encoding: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::invalid("base_url", format!("'{}': {}", base_url, e)))?;
        let encoding = Encoding::for_label(encoding.as_bytes())
            .ok_or_else(|| ConfigError::invalid("encoding", format!("未知编码 '{}'", encoding)))?;

        Ok(Self {
            client,
            base_url,
            encoding,
        })
    }

    /// 第 `index` 页的请求地址
    ///
    /// 只有 RANGE 随页码变化
    pub fn page_url(&self, index: PageIndex) -> Url {
        let range = format!("{}1/{}", index, PAGE_SIZE);
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("ORGNAME_field", "")
            .append_pair("STATECD_field", "")
            .append_pair("ORGNAME", "")
            .append_pair("STATECD", "")
            .append_pair("SQLNAME", "DIR_VAWD")
            .append_pair("RANGE", &range)
            .append_pair("sort", "ORGNAME")
            .append_pair("showall", "Y")
            .append_pair("wbp", "VAWDList.htm")
            .append_pair("whp", "VAWDheader.htm")
            .append_pair("wmt", "main_template_vawd.htm")
            .append_pair("SHOWSQL", "N");
        url
    }

    /// 按固定编码解码，忽略响应头里的 charset
    pub fn decode(&self, index: PageIndex, bytes: &[u8]) -> Result<String, DecodeError> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(DecodeError {
                index,
                encoding: self.encoding.name(),
                len: bytes.len(),
            })
    }

    async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let url_str = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(&url_str, e))?;
        Ok(bytes.to_vec())
    }
}

impl PageSource for PageFetcher {
    async fn fetch(&self, index: PageIndex) -> Result<RawPage, PageError> {
        let url = self.page_url(index);
        debug!("GET 第 {} 页: {}", index + 1, url);

        let bytes = self.get_bytes(url).await?;
        let text = self.decode(index, &bytes)?;

        debug!("第 {} 页: {} 字节", index + 1, bytes.len());
        Ok(RawPage::new(index, text))
    }
}
