// ==========================================
// AHSP RAB 计算核心 - 计算参数
// ==========================================
// 职责: 表头关键字 / 模板标记 / 费率 / 上限 等可调参数
// 红线: 默认值即为标准 AHSP 表格的行为
// ==========================================

use serde::{Deserialize, Serialize};

/// 计算管道参数（单次会话内只读）
///
/// 所有字段都有默认值，JSON 配置文件只需写出要覆写的键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorConfig {
    /// 管理费与利润率（0~1），默认 0.10
    #[serde(default = "default_overhead_rate")]
    pub overhead_rate: f64,

    /// 价格表头最多扫描的行数
    #[serde(default = "default_header_scan_lines")]
    pub header_scan_lines: usize,

    /// 价格表头行必须同时包含的关键字（大写比较）
    #[serde(default = "default_price_header_keywords")]
    pub price_header_keywords: Vec<String>,

    /// 分析表中的模板行标记（表头重复、分段标签、合计行）
    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,

    /// 部分名称匹配允许的最大长度差（不含）
    #[serde(default = "default_partial_match_max_len_diff")]
    pub partial_match_max_len_diff: usize,

    /// 系数列上限（不含）
    #[serde(default = "default_max_coefficient")]
    pub max_coefficient: f64,

    /// 单位列最大字符数
    #[serde(default = "default_max_unit_len")]
    pub max_unit_len: usize,

    /// 单个上传文件的字节上限（解码前检查）
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,

    /// CSV 分隔符
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            overhead_rate: default_overhead_rate(),
            header_scan_lines: default_header_scan_lines(),
            price_header_keywords: default_price_header_keywords(),
            skip_markers: default_skip_markers(),
            partial_match_max_len_diff: default_partial_match_max_len_diff(),
            max_coefficient: default_max_coefficient(),
            max_unit_len: default_max_unit_len(),
            max_file_bytes: default_max_file_bytes(),
            delimiter: default_delimiter(),
        }
    }
}

impl CalculatorConfig {
    /// CSV 读取器使用的单字节分隔符（非 ASCII 时退回逗号）
    pub fn delimiter_byte(&self) -> u8 {
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }
}

fn default_overhead_rate() -> f64 {
    0.10
}

fn default_header_scan_lines() -> usize {
    30
}

fn default_price_header_keywords() -> Vec<String> {
    vec!["KODE".to_string(), "SATUAN".to_string()]
}

fn default_skip_markers() -> Vec<String> {
    [
        "URAIAN",
        "JUMLAH",
        "HARGA SATUAN",
        "TENAGA KERJA",
        "BAHAN",
        "PERALATAN",
        "BIAYA UMUM",
        "CATATAN",
        "REVISI",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_partial_match_max_len_diff() -> usize {
    15
}

fn default_max_coefficient() -> f64 {
    10_000.0
}

fn default_max_unit_len() -> usize {
    8
}

fn default_max_file_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_delimiter() -> char {
    ','
}
