//! 应用入口 - 编排层
//!
//! 组装抓取器、分页引擎和输出，运行一次完整的抓取

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{PageFetcher, PageSource};
use crate::orchestrator::pagination_engine::{PaginationEngine, RunOutcome, RunReport};
use crate::services::{FileSink, Sink};
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App<S = PageFetcher, K = FileSink> {
    config: Config,
    engine: PaginationEngine<S>,
    sink: K,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;
        let fetcher = PageFetcher::new(&config).context("无法创建页面抓取器")?;
        let sink = FileSink::new(&config.json_output, &config.csv_output);
        Self::with_parts(config, fetcher, sink)
    }
}

impl<S: PageSource, K: Sink> App<S, K> {
    /// 使用自定义的页面来源和输出
    pub fn with_parts(config: Config, source: S, sink: K) -> Result<Self> {
        let engine = PaginationEngine::from_config(source, &config).context("无法创建分页引擎")?;
        Ok(Self {
            config,
            engine,
            sink,
        })
    }

    /// 运行应用主逻辑
    ///
    /// 引擎失败不算 Err，调用方通过 `RunReport::is_done` 判断；
    /// 只有写输出失败才返回 Err
    pub async fn run(&self) -> Result<RunReport> {
        log_startup(&self.config);

        let report = self.engine.run().await;

        match &report.outcome {
            RunOutcome::Done(_) => {
                self.sink
                    .write(&report.records)
                    .context("写出结果失败")?;
            }
            RunOutcome::Failed { .. } if self.config.write_partial => {
                warn!("⚠️ 抓取未完成，写出已获取的 {} 条记录", report.records.len());
                self.sink
                    .write(&report.records)
                    .context("写出部分结果失败")?;
            }
            RunOutcome::Failed { .. } => {
                info!("抓取未完成，不写出结果");
            }
        }

        print_final_stats(&report, &self.config);
        Ok(report)
    }
}
