// ==========================================
// AHSP RAB 计算核心 - 结构化分析表解析器
// ==========================================
// 格式: 首行为表头, 含 uraian 及 tenaga / bahan / alat 中任一列
//       每行一个作业, 分项写在单元格内: "Pekerja 0.5; Mandor 0.05"
// 红线: 单个分项解析失败只丢弃该分项
// ==========================================

use crate::config::CalculatorConfig;
use crate::domain::{Component, ComponentCategory, Job, JobMap, ParseStats, ParsedAnalysis};
use crate::importer::analysis_parser::HeuristicAnalysisParser;
use crate::importer::importer_trait::AnalysisParser;
use crate::importer::number_parser::try_parse_coefficient;
use tracing::{debug, info};

/// 分项列名 → 类别
const COMPONENT_COLUMNS: [(&str, ComponentCategory); 3] = [
    ("tenaga", ComponentCategory::Labor),
    ("bahan", ComponentCategory::Material),
    ("alat", ComponentCategory::Equipment),
];

// ==========================================
// StructuredLayout - 表头列位置
// ==========================================
#[derive(Debug, Clone, PartialEq)]
struct StructuredLayout {
    kode: Option<usize>,
    uraian: usize,
    satuan: Option<usize>,
    components: Vec<(usize, ComponentCategory)>,
}

impl StructuredLayout {
    fn from_header(header: &[String]) -> Option<Self> {
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let uraian = position("uraian")?;
        let components: Vec<(usize, ComponentCategory)> = COMPONENT_COLUMNS
            .iter()
            .filter_map(|(name, category)| position(name).map(|idx| (idx, *category)))
            .collect();
        if components.is_empty() {
            return None;
        }

        Some(Self {
            kode: position("kode"),
            uraian,
            satuan: position("satuan"),
            components,
        })
    }
}

// ==========================================
// StructuredAnalysisParser - 结构化分析表解析器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredAnalysisParser;

impl StructuredAnalysisParser {
    /// 首行是否为结构化表头
    pub fn detect(rows: &[Vec<String>]) -> bool {
        rows.first()
            .and_then(|header| StructuredLayout::from_header(header))
            .is_some()
    }

    /// 解析单元格内的分项列表
    ///
    /// # 规则
    /// - 以 ';' 分隔; "-" / 空 / "nan" 跳过
    /// - 每段按最后一个空格切分为 名称 + 系数
    /// - 名称为空或系数非数字 / 负数的分段丢弃
    pub fn parse_component_cell(cell: &str, category: ComponentCategory) -> Vec<Component> {
        let cell = cell.trim();
        if is_blank_cell(cell) {
            return Vec::new();
        }

        cell.split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty() && *part != "-")
            .filter_map(|part| {
                let (name, number) = part.rsplit_once(' ')?;
                let name = name.trim();
                let coefficient = try_parse_coefficient(number).filter(|v| *v >= 0.0)?;
                if name.is_empty() {
                    return None;
                }
                Some(Component {
                    name: name.to_string(),
                    code: None,
                    unit: String::new(),
                    coefficient,
                    category,
                })
            })
            .collect()
    }
}

impl AnalysisParser for StructuredAnalysisParser {
    fn parse_rows(&self, rows: &[Vec<String>]) -> ParsedAnalysis {
        let mut jobs = JobMap::new();
        let mut stats = ParseStats::default();

        let Some(layout) = rows.first().and_then(|h| StructuredLayout::from_header(h)) else {
            return ParsedAnalysis { jobs, stats };
        };
        stats.lines_total = 1;
        stats.skipped_lines = 1;
        debug!(?layout, "结构化表头识别完成");

        for row in &rows[1..] {
            stats.lines_total += 1;
            let get = |idx: Option<usize>| {
                idx.and_then(|i| row.get(i))
                    .map(|v| v.trim())
                    .filter(|v| !is_blank_cell(v))
                    .unwrap_or("")
            };

            let title = get(Some(layout.uraian));
            if title.is_empty() {
                stats.skipped_lines += 1;
                continue;
            }
            stats.job_headers += 1;

            let components: Vec<Component> = layout
                .components
                .iter()
                .flat_map(|(idx, category)| Self::parse_component_cell(get(Some(*idx)), *category))
                .collect();

            if components.is_empty() {
                stats.discarded_empty_jobs += 1;
                continue;
            }
            stats.components += components.len();

            let kode = get(layout.kode);
            let satuan = get(layout.satuan);
            debug!(kode = %kode, satuan = %satuan, count = components.len(), "结构化作业解析完成");

            jobs.insert(Job {
                id: if kode.is_empty() { "-".to_string() } else { kode.to_string() },
                title: title.to_string(),
                components,
            });
        }

        info!(
            jobs = jobs.len(),
            components = stats.components,
            discarded_empty_jobs = stats.discarded_empty_jobs,
            "结构化分析表解析完成"
        );
        ParsedAnalysis { jobs, stats }
    }
}

/// 按首行自动选择解析器
///
/// # 规则
/// - 首行为结构化表头: StructuredAnalysisParser
/// - 否则: HeuristicAnalysisParser（状态机）
pub fn parse_any_analysis(rows: &[Vec<String>], config: &CalculatorConfig) -> ParsedAnalysis {
    if StructuredAnalysisParser::detect(rows) {
        debug!("识别为结构化分析表");
        StructuredAnalysisParser.parse_rows(rows)
    } else {
        HeuristicAnalysisParser::new(config).parse_rows(rows)
    }
}

/// pandas 导出的空值写法
fn is_blank_cell(value: &str) -> bool {
    value.is_empty() || value == "-" || value.eq_ignore_ascii_case("nan")
}
