//! 单页处理流程 - 流程层
//!
//! 核心职责：定义"一页"的完整处理流程
//!
//! 流程顺序：
//! 1. 抓取（每次请求都经过请求闸门，失败时有限次重试）
//! 2. 解析
//! 3. 分类：Stop 直接返回
//! 4. 提取记录

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ConfigError, PageError};
use crate::infrastructure::{PageSource, RequestGate};
use crate::models::{PageClass, PageIndex, PageOutcome, RawPage};
use crate::services::{PageClassifier, ParsedPage, TableExtractor, TableLocator};

/// 单页处理流程
///
/// - 不持有结果集
/// - 不知道分页何时结束，也不关心其他页
/// - 只依赖页面来源和业务能力（services）
pub struct PageFlow<S> {
    source: S,
    classifier: PageClassifier,
    extractor: TableExtractor,
    max_retries: u32,
    retry_delay: Duration,
}

impl<S: PageSource> PageFlow<S> {
    /// 根据配置创建流程
    pub fn new(source: S, config: &Config) -> Result<Self, ConfigError> {
        let locator = TableLocator::new(&config.container_selector)?;
        Ok(Self {
            source,
            classifier: PageClassifier::new(locator.clone()),
            extractor: TableExtractor::new(locator),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// 处理第 `index` 页
    ///
    /// 首次请求和每次重试都要先从 `gate` 预约发起时刻
    pub async fn run(
        &self,
        index: PageIndex,
        gate: &RequestGate,
    ) -> Result<PageOutcome, PageError> {
        let raw = self.fetch_with_retry(index, gate).await?;
        Ok(self.evaluate(&raw))
    }

    /// 分类并提取，和抓取无关
    pub fn evaluate(&self, raw: &RawPage) -> PageOutcome {
        let parsed = ParsedPage::parse(raw);
        match self.classifier.classify(&parsed) {
            PageClass::Continue => {
                let records = self.extractor.extract(&parsed);
                debug!("第 {} 页: 提取到 {} 条记录", raw.index + 1, records.len());
                PageOutcome::Continue(records)
            }
            PageClass::Stop => PageOutcome::Stop,
        }
    }

    async fn fetch_with_retry(
        &self,
        index: PageIndex,
        gate: &RequestGate,
    ) -> Result<RawPage, PageError> {
        let mut attempt = 0;
        loop {
            gate.acquire().await;
            match self.source.fetch(index).await {
                Ok(raw) => return Ok(raw),
                Err(e) if e.is_retriable() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        "第 {} 页抓取失败 (重试 {}/{}): {}",
                        index + 1,
                        attempt,
                        self.max_retries,
                        e
                    );
                    sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
