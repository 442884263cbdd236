// ==========================================
// AHSP RAB 计算核心 - 价格库加载器
// ==========================================
// 职责: 表头探测 → 列映射 → 行清洗 → 双索引
// 格式: 标准价格表（KODE + SATUAN 表头, 印尼数字）
//       简表（仅 nama + harga 两列, 普通小数）作为后备
// 红线: 表头缺失为文件级错误; 行级异常（空名称、坏数字）就地处理
// ==========================================

use crate::config::CalculatorConfig;
use crate::domain::{PriceIndex, PriceRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{check_upload_size, CsvParser};
use crate::importer::importer_trait::{FileParser, PriceLoader};
use crate::importer::number_parser::{parse_indo_number, parse_plain_number};
use tracing::{debug, info};

/// 简表名称列
const SIMPLE_NAME_COLUMN: &str = "NAMA";
/// 简表价格列
const SIMPLE_PRICE_COLUMN: &str = "HARGA";

/// 价格单元格解析函数
type PriceParser = fn(&str) -> f64;

// ==========================================
// ColumnMapping - 价格表列位置
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub code: Option<usize>,
    pub name: Option<usize>,
    pub unit: Option<usize>,
    pub price: Option<usize>,
}

impl ColumnMapping {
    /// 按子串规则映射表头（大小写不敏感）
    ///
    /// # 规则（每列按此优先级只归一类，同类取第一列）
    /// 1. 含 KODE → code
    /// 2. 含 URAIAN / UPAH / MATERIAL → name
    /// 3. 含 SATUAN 且不含 HARGA → unit
    /// 4. 含 HARGA → price
    pub fn from_header(header: &[String]) -> Self {
        let mut mapping = ColumnMapping::default();

        for (idx, column) in header.iter().enumerate() {
            let upper = column.trim().to_uppercase();
            let slot = if upper.contains("KODE") {
                &mut mapping.code
            } else if ["URAIAN", "UPAH", "MATERIAL"]
                .iter()
                .any(|k| upper.contains(k))
            {
                &mut mapping.name
            } else if upper.contains("SATUAN") && !upper.contains("HARGA") {
                &mut mapping.unit
            } else if upper.contains("HARGA") {
                &mut mapping.price
            } else {
                continue;
            };

            if slot.is_none() {
                *slot = Some(idx);
            }
        }

        mapping
    }

    /// 简表映射: 表头含名为 nama 与 harga 的列（整格匹配, 大小写不敏感）
    ///
    /// # 返回
    /// - None: 不是简表表头
    pub fn from_simple_header(header: &[String]) -> Option<Self> {
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Some(Self {
            code: None,
            name: Some(position(SIMPLE_NAME_COLUMN)?),
            unit: None,
            price: Some(position(SIMPLE_PRICE_COLUMN)?),
        })
    }
}

// ==========================================
// PriceDatabaseLoader - 价格库加载器
// ==========================================
pub struct PriceDatabaseLoader {
    header_scan_lines: usize,
    header_keywords: Vec<String>,
    delimiter: u8,
    max_file_bytes: usize,
}

impl PriceDatabaseLoader {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            header_scan_lines: config.header_scan_lines,
            header_keywords: config
                .price_header_keywords
                .iter()
                .map(|k| k.trim().to_uppercase())
                .filter(|k| !k.is_empty())
                .collect(),
            delimiter: config.delimiter_byte(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// 从 CSV 原始字节加载
    ///
    /// # 返回
    /// - Ok(PriceIndex): 价格双索引
    /// - Err(HeaderNotFound / MissingColumn / EmptyInput / FileTooLarge)
    pub fn load_prices(&self, raw_bytes: &[u8]) -> ImportResult<PriceIndex> {
        check_upload_size("price", raw_bytes, self.max_file_bytes)?;
        let rows = CsvParser::new(self.delimiter).parse_rows(raw_bytes)?;
        self.load_from_rows(&rows)
    }

    /// 探测表头行：前 N 行中第一行同时包含所有关键字者
    pub fn find_header_row(&self, rows: &[Vec<String>]) -> Option<usize> {
        rows.iter()
            .take(self.header_scan_lines)
            .position(|row| {
                let line = row.join(",").to_uppercase();
                self.header_keywords.iter().all(|k| line.contains(k.as_str()))
            })
    }

    /// 探测简表表头（nama + harga）, 扫描范围同 find_header_row
    pub fn find_simple_header_row(
        &self,
        rows: &[Vec<String>],
    ) -> Option<(usize, ColumnMapping)> {
        rows.iter()
            .take(self.header_scan_lines)
            .enumerate()
            .find_map(|(idx, row)| ColumnMapping::from_simple_header(row).map(|m| (idx, m)))
    }

    /// 定位表头并映射列, 标准表头优先
    ///
    /// # 返回
    /// - (表头行号, 列映射, 价格解析函数)
    fn locate_header(
        &self,
        rows: &[Vec<String>],
    ) -> ImportResult<(usize, ColumnMapping, PriceParser)> {
        if let Some(idx) = self.find_header_row(rows) {
            let parser: PriceParser = parse_indo_number;
            return Ok((idx, ColumnMapping::from_header(&rows[idx]), parser));
        }
        if let Some((idx, mapping)) = self.find_simple_header_row(rows) {
            debug!(header_row = idx + 1, "按简表格式（nama + harga）读取价格");
            let parser: PriceParser = parse_plain_number;
            return Ok((idx, mapping, parser));
        }
        Err(ImportError::HeaderNotFound {
            scanned: rows.len().min(self.header_scan_lines),
            keywords: format!(
                "{} | {} + {}",
                self.header_keywords.join(" + "),
                SIMPLE_NAME_COLUMN,
                SIMPLE_PRICE_COLUMN
            ),
        })
    }
}

impl Default for PriceDatabaseLoader {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl PriceLoader for PriceDatabaseLoader {
    fn load_from_rows(&self, rows: &[Vec<String>]) -> ImportResult<PriceIndex> {
        // === 步骤 1-2: 表头探测 + 列映射 ===
        let (header_idx, mapping, parse_price) = self.locate_header(rows)?;
        debug!(header_row = header_idx + 1, ?mapping, "价格表头识别完成");

        let name_col = mapping
            .name
            .ok_or_else(|| ImportError::MissingColumn("URAIAN / UPAH / MATERIAL".to_string()))?;

        // === 步骤 3: 逐行构建索引 ===
        let mut index = PriceIndex::new();
        let mut skipped = 0usize;
        for row in &rows[header_idx + 1..] {
            let name = cell(row, Some(name_col));
            if name.is_empty() {
                skipped += 1;
                continue;
            }

            let code = cell(row, mapping.code);
            let unit = cell(row, mapping.unit);
            let unit_price = mapping
                .price
                .map(|col| parse_price(&cell(row, Some(col))))
                .unwrap_or(0.0);

            index.insert(PriceRecord {
                code: if code.is_empty() { None } else { Some(code) },
                name,
                unit,
                unit_price,
            });
        }

        info!(
            records = index.record_count(),
            by_name = index.len(),
            by_code = index.code_count(),
            skipped = skipped,
            "价格库加载完成"
        );
        Ok(index)
    }
}

/// 取单元格（TRIM，缺失为空串）
fn cell(row: &[String], col: Option<usize>) -> String {
    col.and_then(|c| row.get(c))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}
