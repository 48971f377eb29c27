//! 页面分类服务 - 业务能力层
//!
//! 判断一页是否还有数据。"空页"和"结构不对的页"一律视为分页结束

use tracing::debug;

use crate::models::PageClass;
use crate::services::table_extractor::{ParsedPage, TableLocator};

/// 页面分类服务
///
/// 只有容器存在、容器内有表、表里至少有一个 td 时才算 Continue
#[derive(Debug, Clone)]
pub struct PageClassifier {
    locator: TableLocator,
}

impl PageClassifier {
    pub fn new(locator: TableLocator) -> Self {
        Self { locator }
    }

    pub fn classify(&self, page: &ParsedPage) -> PageClass {
        match self.locator.table(page) {
            Some(table) if self.locator.has_data_cell(table) => PageClass::Continue,
            Some(_) => {
                debug!("第 {} 页: 表格中没有数据单元格", page.index + 1);
                PageClass::Stop
            }
            None => {
                debug!("第 {} 页: 未找到数据容器或表格", page.index + 1);
                PageClass::Stop
            }
        }
    }
}
