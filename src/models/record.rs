use indexmap::{IndexMap, IndexSet};

/// 一行表格数据：表头 -> 单元格
///
/// 保持表头顺序
pub type Record = IndexMap<String, String>;

/// 按 (页码, 行号) 升序排列的全部记录
pub type ResultSet = Vec<Record>;

/// 所有记录中出现过的字段，按首次出现的顺序
pub fn collect_columns(records: &[Record]) -> Vec<String> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for record in records {
        columns.extend(record.keys().map(String::as_str));
    }
    columns.into_iter().map(str::to_string).collect()
}
