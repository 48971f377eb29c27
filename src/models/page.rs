//! 单页相关的数据类型

use std::fmt;

use crate::models::record::Record;

/// 页码（从 0 开始）
pub type PageIndex = usize;

/// 已解码的原始页面
///
/// 由 PageFetcher 产生，只会被解析一次
#[derive(Debug, Clone)]
pub struct RawPage {
    pub index: PageIndex,
    pub text: String,
}

impl RawPage {
    pub fn new(index: PageIndex, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }
}

/// 分页结束标记，记录在哪一页发现没有更多数据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopSignal {
    pub index: PageIndex,
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 页无数据", self.index + 1)
    }
}

/// 单页分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageClass {
    /// 页面有数据，继续下一页
    Continue,
    /// 页面为空或结构不对，分页结束
    Stop,
}

/// 单页处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// 有数据的页面及其记录
    Continue(Vec<Record>),
    /// 分页结束
    Stop,
}
