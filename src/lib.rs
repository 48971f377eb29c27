//! # ADD Distributor Scrape
//!
//! 抓取 NABP 认证药品分销商（Accredited Drug Distributors）分页列表，
//! 把每页的 HTML 表格转换成记录，汇总后写成 JSON 和 CSV
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端，只暴露能力
//! - `PageFetcher` - 按页码请求并按固定编码解码，实现 `PageSource`
//! - `RequestGate` - 所有请求（含重试）共用的发起间隔
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面或整个结果集
//! - `TableExtractor` - 表格 -> 记录
//! - `PageClassifier` - 判断页面是否还有数据
//! - `FileSink` - 写 JSON / CSV
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一页"的完整处理流程
//! - `PageFlow` - 抓取（重试）→ 解析 → 分类 → 提取
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pagination_engine` - 分页引擎，管理预取窗口、顺序和终止
//! - `orchestrator/app` - 应用入口，组装各层并输出统计
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{ConfigError, DecodeError, FetchError, PageError, SinkError};
pub use infrastructure::{PageFetcher, PageSource, RequestGate};
pub use models::{PageIndex, PageOutcome, RawPage, Record, ResultSet, StopSignal};
pub use orchestrator::{App, EngineState, PaginationEngine, RunOutcome, RunReport};
pub use services::{FileSink, PageClassifier, Sink, TableExtractor, TableLocator};
pub use workflow::PageFlow;
