//! 分页引擎 - 编排层
//!
//! ## 职责
//!
//! 从第 0 页开始逐页探测，直到某一页没有数据为止，并按页码顺序汇总所有记录。
//!
//! ## 并发策略
//!
//! - 预取窗口 `window`：只有 `index < 下一个待提交页 + window` 的页才会被发起
//! - 请求完成顺序任意，结果先放进缓冲区，严格按页码升序提交
//! - 第一次提交到 Stop 或失败时，放弃所有在途请求和更高页码的缓冲结果
//! - 每次运行持有一个 `RequestGate`，首次请求和重试都从它预约时刻，
//!   相邻两次真正发出的请求之间至少间隔 `request_delay`
//! - `window == 1` 即顺序抓取
//!
//! ## 状态
//!
//! ```text
//! Discovering ──Stop──▶ Draining ──▶ Done
//!      │
//!      └──失败──▶ Draining ──▶ Failed
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{ConfigError, PageError};
use crate::infrastructure::{PageSource, RequestGate};
use crate::models::{PageIndex, PageOutcome, ResultSet, StopSignal};
use crate::workflow::PageFlow;

/// 引擎状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// 逐页探测中
    Discovering,
    /// 已确定结束，正在放弃在途请求
    Draining,
    /// 正常结束
    Done,
    /// 某一页失败
    Failed,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineState::Discovering => "Discovering",
            EngineState::Draining => "Draining",
            EngineState::Done => "Done",
            EngineState::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// 运行结局
#[derive(Debug)]
pub enum RunOutcome {
    /// 在 StopSignal 所示页发现没有更多数据
    Done(StopSignal),
    /// 第 `index` 页失败
    Failed { index: PageIndex, error: PageError },
}

/// 一次运行的结果
///
/// 失败时 `records` 是失败页之前已提交的部分结果
#[derive(Debug)]
pub struct RunReport {
    pub records: ResultSet,
    pub outcome: RunOutcome,
    /// 提交为 Continue 的页数
    pub pages_committed: usize,
    /// 实际发出的请求数（含重试和被放弃的预取）
    pub probes_issued: usize,
}

impl RunReport {
    pub fn state(&self) -> EngineState {
        match self.outcome {
            RunOutcome::Done(_) => EngineState::Done,
            RunOutcome::Failed { .. } => EngineState::Failed,
        }
    }

    pub fn is_done(&self) -> bool {
        self.state() == EngineState::Done
    }
}

/// 分页引擎
pub struct PaginationEngine<S> {
    flow: PageFlow<S>,
    window: usize,
    request_delay: Duration,
}

impl<S: PageSource> PaginationEngine<S> {
    /// # 参数
    /// - `flow`: 单页处理流程
    /// - `window`: 预取窗口，小于 1 时按 1 处理
    /// - `request_delay`: 两次发起请求之间的最小间隔
    pub fn new(flow: PageFlow<S>, window: usize, request_delay: Duration) -> Self {
        Self {
            flow,
            window: window.max(1),
            request_delay,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Result<Self, ConfigError> {
        let flow = PageFlow::new(source, config)?;
        Ok(Self::new(flow, config.window, config.request_delay()))
    }

    pub fn flow(&self) -> &PageFlow<S> {
        &self.flow
    }

    /// 运行到 Done 或 Failed
    pub async fn run(&self) -> RunReport {
        let mut state = EngineState::Discovering;
        debug!("引擎状态: {}", state);

        let gate = RequestGate::new(self.request_delay);
        let mut records = ResultSet::new();
        let mut in_flight = FuturesUnordered::new();
        let mut buffered: BTreeMap<PageIndex, Result<PageOutcome, PageError>> = BTreeMap::new();

        let mut next_issue: PageIndex = 0;
        let mut next_commit: PageIndex = 0;

        let outcome = loop {
            while next_issue < next_commit + self.window {
                info!("正在处理第 {} 页", next_issue + 1);
                in_flight.push(self.probe(next_issue, &gate));
                next_issue += 1;
            }

            // 窗口已填满，至少 next_commit 这一页在途
            let Some((index, result)) = in_flight.next().await else {
                unreachable!("预取窗口已满但没有在途请求");
            };
            buffered.insert(index, result);

            if let Some(outcome) = commit_in_order(&mut buffered, &mut next_commit, &mut records) {
                break outcome;
            }
        };

        state = EngineState::Draining;
        let abandoned = in_flight.len() + buffered.len();
        debug!("引擎状态: {} (放弃 {} 个预取页)", state, abandoned);
        drop(in_flight);
        drop(buffered);

        let report = RunReport {
            records,
            outcome,
            pages_committed: next_commit,
            probes_issued: gate.issued(),
        };

        match &report.outcome {
            RunOutcome::Done(stop) => {
                info!("{}，分页结束，共 {} 条记录", stop, report.records.len());
            }
            RunOutcome::Failed { index, error } => {
                error!(
                    "第 {} 页处理失败: {} (已获取 {} 条记录)",
                    index + 1,
                    error,
                    report.records.len()
                );
            }
        }
        debug!("引擎状态: {}", report.state());

        report
    }

    fn probe<'a>(
        &'a self,
        index: PageIndex,
        gate: &'a RequestGate,
    ) -> impl Future<Output = (PageIndex, Result<PageOutcome, PageError>)> + 'a {
        async move { (index, self.flow.run(index, gate).await) }
    }
}

/// 从 `next_commit` 开始按页码连续提交缓冲结果
///
/// 遇到 Stop 或失败时返回结局；缺页时返回 None 等待
fn commit_in_order(
    buffered: &mut BTreeMap<PageIndex, Result<PageOutcome, PageError>>,
    next_commit: &mut PageIndex,
    records: &mut ResultSet,
) -> Option<RunOutcome> {
    while let Some(result) = buffered.remove(next_commit) {
        match result {
            Ok(PageOutcome::Continue(page_records)) => {
                records.extend(page_records);
                *next_commit += 1;
            }
            Ok(PageOutcome::Stop) => {
                return Some(RunOutcome::Done(StopSignal {
                    index: *next_commit,
                }));
            }
            Err(error) => {
                return Some(RunOutcome::Failed {
                    index: *next_commit,
                    error,
                });
            }
        }
    }
    None
}
