use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
///
/// 优先级：默认值 < TOML 文件 < 环境变量 < 命令行参数
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 列表接口地址（不含查询参数）
    pub base_url: String,
    /// JSON 输出路径
    pub json_output: String,
    /// CSV 输出路径
    pub csv_output: String,
    /// 预取窗口大小，1 表示顺序抓取
    pub window: usize,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 两次发起请求之间的最小间隔（毫秒）
    pub request_delay_ms: u64,
    /// 单页失败后的最大重试次数
    pub max_retries: u32,
    /// 重试前等待（毫秒）
    pub retry_delay_ms: u64,
    /// 数据所在容器的 CSS 选择器
    pub container_selector: String,
    /// 响应体编码
    pub encoding: String,
    pub user_agent: String,
    /// 失败时是否仍然写出已抓取的部分结果
    pub write_partial: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://cv.nabp.net/cvweb2/cgi-bin/utilities.dll/CustomList".to_string(),
            json_output: "vwad_list.json".to_string(),
            csv_output: "vwad_list.csv".to_string(),
            window: 4,
            request_timeout_secs: 30,
            request_delay_ms: 500,
            max_retries: 2,
            retry_delay_ms: 1000,
            container_selector: "div.info".to_string(),
            encoding: "ISO-8859-1".to_string(),
            user_agent: concat!("add_distributor_scrape/", env!("CARGO_PKG_VERSION")).to_string(),
            write_partial: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载（文件中未出现的字段取默认值），再叠加环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.with_env()
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_string("SCRAPER_BASE_URL").unwrap_or(self.base_url),
            json_output: env_string("SCRAPER_JSON_OUT").unwrap_or(self.json_output),
            csv_output: env_string("SCRAPER_CSV_OUT").unwrap_or(self.csv_output),
            window: env_parse("SCRAPER_WINDOW", "usize")?.unwrap_or(self.window),
            request_timeout_secs: env_parse("SCRAPER_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            request_delay_ms: env_parse("SCRAPER_DELAY_MS", "u64")?
                .unwrap_or(self.request_delay_ms),
            max_retries: env_parse("SCRAPER_MAX_RETRIES", "u32")?.unwrap_or(self.max_retries),
            retry_delay_ms: env_parse("SCRAPER_RETRY_DELAY_MS", "u64")?
                .unwrap_or(self.retry_delay_ms),
            container_selector: self.container_selector,
            encoding: self.encoding,
            user_agent: self.user_agent,
            write_partial: env_parse("SCRAPER_WRITE_PARTIAL", "bool")?
                .unwrap_or(self.write_partial),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
        })
    }

    /// 检查配置是否可用
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 {
            return Err(ConfigError::invalid("window", "预取窗口至少为 1"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("base_url", "不能为空"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "超时必须大于 0"));
        }
        if encoding_rs::Encoding::for_label(self.encoding.as_bytes()).is_none() {
            return Err(ConfigError::invalid(
                "encoding",
                format!("未知编码 '{}'", self.encoding),
            ));
        }
        if let Err(e) = scraper::Selector::parse(&self.container_selector) {
            return Err(ConfigError::invalid(
                "container_selector",
                format!("'{}': {}", self.container_selector, e),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
