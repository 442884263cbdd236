// ==========================================
// AHSP RAB 计算核心 - 文件解析器实现
// ==========================================
// 依据: 阶段 0: 原始字节 → 行网格（Vec<Vec<String>>）
// 支持: CSV (.csv, 非法字节替换解码) / Excel (.xlsx)
// 红线: 不假设表头位置, 表头识别交给上层
// ==========================================

use crate::config::CalculatorConfig;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

// ==========================================
// Upload - 调用方提供的原始文件
// ==========================================
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String, // 文件名（用于选择解析器与日志）
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 从磁盘读取（先检查大小上限再读入）
    pub fn from_path<P: AsRef<Path>>(path: P, max_file_bytes: usize) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let size = std::fs::metadata(path)?.len() as usize;
        if size > max_file_bytes {
            return Err(ImportError::FileTooLarge {
                size,
                limit: max_file_bytes,
            });
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// 小写扩展名（无扩展名时为空串）
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

/// 字节 → 文本，非法字节序列替换为 U+FFFD，去掉 UTF-8 BOM
pub fn decode_lossy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text[..]).to_string()
}

/// 文件级前置检查：空文件 / 超过上限
pub fn check_upload_size(name: &str, bytes: &[u8], max_file_bytes: usize) -> ImportResult<()> {
    if bytes.is_empty() {
        return Err(ImportError::EmptyInput(name.to_string()));
    }
    if bytes.len() > max_file_bytes {
        return Err(ImportError::FileTooLarge {
            size: bytes.len(),
            limit: max_file_bytes,
        });
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for CsvParser {
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        let text = decode_lossy(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .delimiter(self.delimiter)
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            match result {
                Ok(record) => {
                    rows.push(record.iter().map(|v| v.trim().to_string()).collect());
                }
                Err(e) => {
                    // 单行损坏不阻断整个文件
                    warn!(row = row_idx + 1, error = %e, "CSV 行解析失败，已跳过");
                }
            }
        }

        debug!(rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        debug!(sheet = %sheet_name, rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

/// 单元格 → 文本；数值按印尼格式输出，下游统一用 NumberParser 解析
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Float(f) => f.to_string().replace('.', ","),
        Data::Int(i) => i.to_string(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser {
    delimiter: u8,
    max_file_bytes: usize,
}

impl UniversalFileParser {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// 解析上传文件为行网格
    ///
    /// # 规则
    /// - 空文件 / 超限: 直接报错
    /// - .xlsx: ExcelParser
    /// - .csv / .txt / 无扩展名: CsvParser
    pub fn parse(&self, upload: &Upload) -> ImportResult<Vec<Vec<String>>> {
        check_upload_size(&upload.name, &upload.bytes, self.max_file_bytes)?;

        match upload.extension().as_str() {
            "xlsx" => ExcelParser.parse_rows(&upload.bytes),
            "csv" | "txt" | "" => CsvParser::new(self.delimiter).parse_rows(&upload.bytes),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}
