//! 指数数据集
//!
//! 从 CSV 文件加载全部指数记录，供数据接口查询。
//! 空单元格及常见缺失值标记统一替换为 "No Data"

use std::io::Read;
use std::path::Path;

use serde_json::{Number, Value};

use crate::error::DatasetError;
use crate::models::{value_label, RawRecord, NO_DATA};

/// 公司名称列
pub const NAME_COLUMN: &str = "index_name";
/// 日期列
pub const DATE_COLUMN: &str = "index_date";

/// 视为缺失值的单元格内容
const MISSING_MARKERS: [&str; 11] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "<NA>",
];

/// 内存中的指数数据集
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<RawRecord>,
}

impl Dataset {
    /// 从 CSV 读取数据集
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        if !headers.is_empty() && !headers.iter().any(|h| h == NAME_COLUMN) {
            return Err(DatasetError::MissingColumn(NAME_COLUMN.to_string()));
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            let mut row = RawRecord::new();
            for (index, header) in headers.iter().enumerate() {
                let cell = record.get(index).unwrap_or("");
                row.insert(header.to_string(), parse_cell(cell));
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    /// 从文件读取数据集
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// 读取数据集，失败时返回空数据集（服务照常启动，接口返回错误）
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(dataset) => {
                log::info!("从 {} 加载 {} 条记录", path.display(), dataset.len());
                dataset
            }
            Err(e) => {
                log::error!("加载数据文件 {} 失败: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 去重后的公司名称，保持首次出现的顺序
    pub fn companies(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.rows.iter().filter_map(row_name) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// 某公司的全部记录
    pub fn company(&self, name: &str) -> Vec<RawRecord> {
        self.rows
            .iter()
            .filter(|row| row_name(row).as_deref() == Some(name))
            .cloned()
            .collect()
    }

    /// 某公司在指定日期的记录
    pub fn company_on(&self, name: &str, date: &str) -> Vec<RawRecord> {
        self.company(name)
            .into_iter()
            .filter(|row| row.get(DATE_COLUMN).and_then(value_label).as_deref() == Some(date))
            .collect()
    }
}

fn row_name(row: &RawRecord) -> Option<String> {
    row.get(NAME_COLUMN)
        .and_then(value_label)
        .filter(|name| name != NO_DATA)
}

/// 单元格类型推断：整数、浮点数，否则保留为字符串
fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if MISSING_MARKERS.contains(&trimmed) {
        return Value::String(NO_DATA.to_string());
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(cell.to_string())
}
