//! 结果输出服务 - 业务能力层
//!
//! 把整个结果集写成 JSON 和 CSV 两份文件，每次运行都整体覆盖

use std::fs;
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::info;

use crate::error::SinkError;
use crate::models::{collect_columns, Record};

/// 结果输出
pub trait Sink {
    fn write(&self, records: &[Record]) -> Result<(), SinkError>;
}

/// 写本地文件的输出
#[derive(Debug, Clone)]
pub struct FileSink {
    json_path: PathBuf,
    csv_path: PathBuf,
}

impl FileSink {
    pub fn new(json_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            csv_path: csv_path.into(),
        }
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

impl Sink for FileSink {
    /// 两份内容都先在内存里生成并写入临时文件，全部成功后才替换目标文件
    fn write(&self, records: &[Record]) -> Result<(), SinkError> {
        let json = to_json(records)?;
        let csv = to_csv(&self.csv_path, records)?;

        let json_tmp = stage(&self.json_path, &json)?;
        let csv_tmp = match stage(&self.csv_path, &csv) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = fs::remove_file(&json_tmp);
                return Err(e);
            }
        };

        commit(&json_tmp, &self.json_path)?;
        commit(&csv_tmp, &self.csv_path)?;

        info!(
            "已写出 {} 条记录: {} / {}",
            records.len(),
            self.json_path.display(),
            self.csv_path.display()
        );
        Ok(())
    }
}

/// 记录数组，缩进 3 个空格，字段顺序与表头一致
pub fn to_json(records: &[Record]) -> Result<Vec<u8>, SinkError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"   ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    Ok(buf)
}

/// 表头取所有记录字段的并集（按首次出现顺序），缺失的字段写空串
fn to_csv(path: &Path, records: &[Record]) -> Result<Vec<u8>, SinkError> {
    let csv_err = |source| SinkError::Csv {
        path: path.display().to_string(),
        source,
    };

    let columns = collect_columns(records);
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns).map_err(csv_err)?;
        for record in records {
            let row = columns
                .iter()
                .map(|column| record.get(column).map(String::as_str).unwrap_or(""));
            writer.write_record(row).map_err(csv_err)?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| SinkError::WriteFailed {
            path: path.display().to_string(),
            source: e.into_error(),
        })
}

/// 目标文件旁的临时文件，例如 `vwad_list.csv.tmp`
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn stage(path: &Path, content: &[u8]) -> Result<PathBuf, SinkError> {
    let tmp = staging_path(path);
    fs::write(&tmp, content).map_err(|source| SinkError::WriteFailed {
        path: tmp.display().to_string(),
        source,
    })?;
    Ok(tmp)
}

fn commit(tmp: &Path, path: &Path) -> Result<(), SinkError> {
    fs::rename(tmp, path).map_err(|source| SinkError::WriteFailed {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_json_keeps_field_order() {
        let records = vec![record(&[("STATECD", "CA"), ("ORGNAME", "Acme Pharma")])];
        let json = String::from_utf8(to_json(&records).unwrap()).unwrap();
        assert_eq!(
            json,
            "[\n   {\n      \"STATECD\": \"CA\",\n      \"ORGNAME\": \"Acme Pharma\"\n   }\n]"
        );
    }

    #[test]
    fn test_empty_result_set() {
        assert_eq!(to_json(&[]).unwrap(), b"[]");

        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out.json"), dir.path().join("out.csv"));
        sink.write(&[]).unwrap();
        assert_eq!(fs::read_to_string(sink.csv_path()).unwrap(), "");
    }

    #[test]
    fn test_csv_union_of_columns() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out.json"), dir.path().join("out.csv"));
        let records = vec![
            record(&[("ORGNAME", "Acme Pharma"), ("STATECD", "CA")]),
            record(&[("ORGNAME", "Beta, Inc."), ("CITY", "Austin")]),
        ];

        sink.write(&records).unwrap();

        let csv = fs::read_to_string(sink.csv_path()).unwrap();
        assert_eq!(
            csv,
            "ORGNAME,STATECD,CITY\nAcme Pharma,CA,\n\"Beta, Inc.\",,Austin\n"
        );
    }

    #[test]
    fn test_write_overwrites_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out.json"), dir.path().join("out.csv"));

        sink.write(&[record(&[("A", "1")]), record(&[("A", "2")])]).unwrap();
        sink.write(&[record(&[("A", "3")])]).unwrap();

        let csv = fs::read_to_string(sink.csv_path()).unwrap();
        assert_eq!(csv, "A\n3\n");
        let json: Vec<Record> =
            serde_json::from_str(&fs::read_to_string(sink.json_path()).unwrap()).unwrap();
        assert_eq!(json, vec![record(&[("A", "3")])]);
    }

    #[test]
    fn test_failed_csv_leaves_previous_pair_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("out.json");
        let csv_path = dir.path().join("out.csv");
        FileSink::new(&json_path, &csv_path)
            .write(&[record(&[("A", "1")])])
            .unwrap();

        // CSV 所在目录不存在，CSV 必然写失败
        let broken = FileSink::new(&json_path, dir.path().join("missing").join("out.csv"));
        assert!(broken.write(&[record(&[("A", "2")])]).is_err());

        let json: Vec<Record> =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json, vec![record(&[("A", "1")])]);
        assert_eq!(fs::read_to_string(&csv_path).unwrap(), "A\n1\n");
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[test]
    fn test_non_ascii_written_as_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("out.json"), dir.path().join("out.csv"));
        sink.write(&[record(&[("ORGNAME", "Pharmacie Générale")])]).unwrap();

        let json = fs::read_to_string(sink.json_path()).unwrap();
        assert!(json.contains("Pharmacie Générale"));
    }
}
