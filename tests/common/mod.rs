#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use add_distributor_scrape::{
    Config, FetchError, PageError, PageFlow, PageIndex, PageSource, PaginationEngine, RawPage,
    Record,
};
use tokio::time::{sleep, Instant};

/// 模拟站点上的一页
#[derive(Clone)]
pub enum MockPage {
    /// 有数据的表格，每行 (ORGNAME, STATECD)
    Rows(Vec<(&'static str, &'static str)>),
    /// 容器存在但是空的
    Empty,
    /// 返回非成功状态码
    Status(u16),
    /// 第一次请求返回 503，之后返回数据
    FailOnce(Vec<(&'static str, &'static str)>),
}

/// 内存中的分页站点
///
/// 超出 `pages` 的页码一律返回空容器
pub struct MockSite {
    pages: Vec<MockPage>,
    delays: Vec<Duration>,
    calls: Mutex<Vec<(PageIndex, Instant)>>,
}

impl MockSite {
    pub fn new(pages: Vec<MockPage>) -> Self {
        Self {
            pages,
            delays: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 每页响应耗时
    pub fn with_delays(mut self, delays: Vec<Duration>) -> Self {
        self.delays = delays;
        self
    }

    /// 按发起顺序记录的页码
    pub fn requested(&self) -> Vec<PageIndex> {
        self.calls.lock().unwrap().iter().map(|(i, _)| *i).collect()
    }

    pub fn request_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

impl PageSource for MockSite {
    async fn fetch(&self, index: PageIndex) -> Result<RawPage, PageError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let attempt = calls.iter().filter(|(i, _)| *i == index).count();
            calls.push((index, Instant::now()));
            attempt
        };

        let delay = self.delays.get(index).copied().unwrap_or(Duration::ZERO);
        sleep(delay).await;

        match self.pages.get(index).cloned().unwrap_or(MockPage::Empty) {
            MockPage::Rows(rows) => Ok(RawPage::new(index, table_html(&rows))),
            MockPage::Empty => Ok(RawPage::new(index, EMPTY_HTML)),
            MockPage::Status(status) => Err(FetchError::Status {
                url: format!("mock://page/{}", index),
                status,
            }
            .into()),
            MockPage::FailOnce(_) if attempt == 0 => Err(FetchError::Status {
                url: format!("mock://page/{}", index),
                status: 503,
            }
            .into()),
            MockPage::FailOnce(rows) => Ok(RawPage::new(index, table_html(&rows))),
        }
    }
}

pub const EMPTY_HTML: &str =
    r#"<html><body><div class="header">ADD</div><div class="info"></div></body></html>"#;

pub fn table_html(rows: &[(&str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(name, state)| format!("<tr><td>{}</td><td>{}</td></tr>", name, state))
        .collect();
    format!(
        r#"<html><body><div class="info"><table>
        <tr><th>ORGNAME</th><th>STATECD</th></tr>{}
        </table></div></body></html>"#,
        body
    )
}

pub fn record(name: &str, state: &str) -> Record {
    [
        ("ORGNAME".to_string(), name.to_string()),
        ("STATECD".to_string(), state.to_string()),
    ]
    .into_iter()
    .collect()
}

/// 无请求间隔、无重试的配置
pub fn test_config(window: usize) -> Config {
    Config {
        window,
        request_delay_ms: 0,
        max_retries: 0,
        retry_delay_ms: 0,
        ..Config::default()
    }
}

pub fn engine(site: MockSite, window: usize) -> PaginationEngine<MockSite> {
    PaginationEngine::from_config(site, &test_config(window)).unwrap()
}

pub fn engine_with_delay(
    site: MockSite,
    window: usize,
    request_delay: Duration,
) -> PaginationEngine<MockSite> {
    let flow = PageFlow::new(site, &test_config(window)).unwrap();
    PaginationEngine::new(flow, window, request_delay)
}

/// 10 页数据，每页 2 行，之后为空页
pub fn ten_page_site() -> Vec<MockPage> {
    const NAMES: [&str; 20] = [
        "Acme Pharma", "Apex Rx", "Beta Distribution", "Bluebird Supply", "Cardinal Co",
        "Cedar Health", "Delta Drug", "Dune Medical", "Echo Wholesale", "Elm Pharma",
        "Falcon Rx", "Fern Supply", "Gamma Health", "Grove Drug", "Harbor Medical",
        "Hill Pharma", "Iris Wholesale", "Ivy Rx", "Juniper Supply", "Jade Health",
    ];
    NAMES
        .chunks(2)
        .map(|pair| MockPage::Rows(pair.iter().map(|name| (*name, "TX")).collect()))
        .collect()
}
