//! 表格提取服务 - 业务能力层
//!
//! 只负责把一页 HTML 里的表格变成记录，不关心分页

use scraper::{ElementRef, Html, Selector};

use crate::error::ConfigError;
use crate::models::{PageIndex, RawPage, Record};

/// 默认的数据容器
pub const DEFAULT_CONTAINER: &str = "div.info";

/// 解析后的页面
///
/// 分类和提取共用同一份解析结果
pub struct ParsedPage {
    pub index: PageIndex,
    document: Html,
}

impl ParsedPage {
    pub fn parse(raw: &RawPage) -> Self {
        Self {
            index: raw.index,
            document: Html::parse_document(&raw.text),
        }
    }

    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// 表格定位器
///
/// 容器 -> 容器内第一张 table -> tr / th / td
#[derive(Debug, Clone)]
pub struct TableLocator {
    container: Selector,
    table: Selector,
    row: Selector,
    header_cell: Selector,
    data_cell: Selector,
}

impl TableLocator {
    /// # 参数
    /// - `container`: 数据容器的 CSS 选择器，例如 `div.info`
    pub fn new(container: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            container: parse_selector("container_selector", container)?,
            table: parse_selector("table", "table")?,
            row: parse_selector("tr", "tr")?,
            header_cell: parse_selector("th", "th")?,
            data_cell: parse_selector("td", "td")?,
        })
    }

    /// 找到容器内的第一张表，容器或表缺失时返回 None
    pub fn table<'a>(&self, page: &'a ParsedPage) -> Option<ElementRef<'a>> {
        let container = page.document().select(&self.container).next()?;
        container.select(&self.table).next()
    }

    /// 表内是否有任意一个数据单元格
    pub fn has_data_cell(&self, table: ElementRef<'_>) -> bool {
        table.select(&self.data_cell).next().is_some()
    }
}

/// 表格提取服务
///
/// 职责：
/// - 第一行的 th 作为表头
/// - 之后每一行的 td 按位置对应表头，生成一条记录
/// - 没有 td 的行跳过
/// - 找不到容器/表格时返回空列表
#[derive(Debug, Clone)]
pub struct TableExtractor {
    locator: TableLocator,
}

impl TableExtractor {
    pub fn new(locator: TableLocator) -> Self {
        Self { locator }
    }

    /// 提取一页的全部记录
    pub fn extract(&self, page: &ParsedPage) -> Vec<Record> {
        let Some(table) = self.locator.table(page) else {
            return Vec::new();
        };

        let mut rows = table.select(&self.locator.row);
        let Some(header_row) = rows.next() else {
            return Vec::new();
        };

        let headers: Vec<String> = header_row
            .select(&self.locator.header_cell)
            .map(cell_text)
            .collect();

        rows.filter_map(|row| {
            let cells: Vec<String> = row.select(&self.locator.data_cell).map(cell_text).collect();
            if cells.is_empty() {
                return None;
            }
            // 单元格少于表头时，后面的列直接缺省
            Some(headers.iter().cloned().zip(cells).collect::<Record>())
        })
        .collect()
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().collect()
}

fn parse_selector(field: &'static str, css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::invalid(field, format!("'{}': {}", css, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TableExtractor {
        TableExtractor::new(TableLocator::new(DEFAULT_CONTAINER).unwrap())
    }

    fn extract_raw(raw: &RawPage) -> Vec<Record> {
        extractor().extract(&ParsedPage::parse(raw))
    }

    fn page(body: &str) -> RawPage {
        RawPage::new(0, format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn test_extract_rows_in_order() {
        let raw = page(
            r#"<div class="info"><table>
                <tr><th>ORGNAME</th><th>STATECD</th></tr>
                <tr><td>Acme Pharma</td><td>CA</td></tr>
                <tr><td>Beta Distribution</td><td>TX</td></tr>
            </table></div>"#,
        );
        let records = extract_raw(&raw);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["ORGNAME"], "Acme Pharma");
        assert_eq!(records[0]["STATECD"], "CA");
        assert_eq!(records[1]["ORGNAME"], "Beta Distribution");
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ORGNAME", "STATECD"]);
    }

    #[test]
    fn test_short_row_omits_trailing_columns() {
        let raw = page(
            r#"<div class="info"><table>
                <tr><th>ORGNAME</th><th>STATECD</th><th>CITY</th></tr>
                <tr><td>Acme Pharma</td></tr>
            </table></div>"#,
        );
        let records = extract_raw(&raw);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].len(), 1);
        assert!(!records[0].contains_key("STATECD"));
    }

    #[test]
    fn test_rows_without_cells_are_skipped() {
        let raw = page(
            r#"<div class="info"><table>
                <tr><th>ORGNAME</th></tr>
                <tr></tr>
                <tr><th>not data</th></tr>
                <tr><td>Acme Pharma</td></tr>
            </table></div>"#,
        );
        let records = extract_raw(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["ORGNAME"], "Acme Pharma");
    }

    #[test]
    fn test_missing_container_or_table_is_empty() {
        let no_container = page("<table><tr><th>A</th></tr><tr><td>1</td></tr></table>");
        assert!(extract_raw(&no_container).is_empty());

        let no_table = page(r#"<div class="info"><p>No results</p></div>"#);
        assert!(extract_raw(&no_table).is_empty());
    }

    #[test]
    fn test_only_first_table_in_container() {
        let raw = page(
            r#"<div class="info">
                <table><tr><th>A</th></tr><tr><td>first</td></tr></table>
                <table><tr><th>A</th></tr><tr><td>second</td></tr></table>
            </div>"#,
        );
        let records = extract_raw(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["A"], "first");
    }

    #[test]
    fn test_cell_text_includes_nested_markup() {
        let raw = page(
            r#"<div class="info"><table>
                <tr><th>ORGNAME</th></tr>
                <tr><td><a href="/x">Acme</a> Pharma</td></tr>
            </table></div>"#,
        );
        let records = extract_raw(&raw);
        assert_eq!(records[0]["ORGNAME"], "Acme Pharma");
    }

    #[test]
    fn test_duplicate_header_last_value_wins() {
        let raw = page(
            r#"<div class="info"><table>
                <tr><th>A</th><th>B</th><th>A</th></tr>
                <tr><td>1</td><td>2</td><td>3</td></tr>
            </table></div>"#,
        );
        let records = extract_raw(&raw);
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(records[0]["A"], "3");
    }
}
