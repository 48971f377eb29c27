use thiserror::Error;

use crate::models::PageIndex;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 单页处理错误
///
/// 引擎只认识这一种错误，并据此决定是否重试
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl PageError {
    /// 是否值得重试
    ///
    /// 网络/超时/非成功状态码可以重试，解码失败重试也没用
    pub fn is_retriable(&self) -> bool {
        matches!(self, PageError::Fetch(_))
    }
}

/// 网络请求错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败（连接、读取响应体等）
    #[error("请求失败 ({url}): {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },
    /// 服务器返回非成功状态码
    #[error("服务器返回非成功状态码 {status} ({url})")]
    Status { url: String, status: u16 },
    /// 请求超时
    #[error("请求超时 ({url})")]
    Timeout { url: String },
}

/// 响应体解码错误
#[derive(Debug, Error)]
#[error("响应体无法按 {encoding} 解码 ({len} 字节)")]
pub struct DecodeError {
    pub index: PageIndex,
    pub encoding: &'static str,
    pub len: usize,
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 字段取值非法
    #[error("配置项 {field} 非法: {reason}")]
    Invalid { field: &'static str, reason: String },
    /// 无法构建 HTTP 客户端
    #[error("无法构建 HTTP 客户端: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// 输出写入错误
#[derive(Debug, Error)]
pub enum SinkError {
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 序列化失败
    #[error("JSON序列化失败: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV 写入失败
    #[error("CSV写入失败 ({path}): {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

// ========== 便捷构造函数 ==========

impl FetchError {
    /// 创建网络请求失败错误
    pub fn network(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        FetchError::Network {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// 把 reqwest 错误映射到对应的种类
    pub fn from_reqwest(url: impl Into<String>, err: reqwest::Error) -> Self {
        let url = url.into();
        if err.is_timeout() {
            FetchError::Timeout { url }
        } else if let Some(status) = err.status() {
            FetchError::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            FetchError::network(url, err)
        }
    }
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
