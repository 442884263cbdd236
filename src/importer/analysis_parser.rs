// ==========================================
// AHSP RAB 计算核心 - 分析表解析器（状态机）
// ==========================================
// 状态: Seeking（无当前作业） / Capturing（作业内累积分项）
// 每行: 作业表头识别 → 模板行过滤 → 分项提取
// 红线: 宁可漏掉分项, 不可编造分项; 无分项的作业不输出
// ==========================================

use crate::config::CalculatorConfig;
use crate::domain::{Component, ComponentCategory, Job, JobMap, ParseStats, ParsedAnalysis};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{check_upload_size, CsvParser};
use crate::importer::importer_trait::{AnalysisParser, FileParser};
use crate::importer::row_classifier::{detect_job_header, RowClassifier};
use tracing::{debug, info, trace};

// ==========================================
// ParserState - 解析状态
// ==========================================
#[derive(Debug)]
enum ParserState {
    Seeking,
    Capturing(OpenJob),
}

/// 正在累积的作业
#[derive(Debug)]
struct OpenJob {
    id: String,
    title: String,
    components: Vec<Component>,
    category: ComponentCategory,
}

impl OpenJob {
    fn new(id: String, title: String) -> Self {
        Self {
            id,
            title,
            components: Vec::new(),
            category: ComponentCategory::Other,
        }
    }
}

// ==========================================
// HeuristicAnalysisParser - 启发式分析表解析器
// ==========================================
pub struct HeuristicAnalysisParser {
    classifier: RowClassifier,
    skip_markers: Vec<String>,
    delimiter: u8,
    max_file_bytes: usize,
}

impl HeuristicAnalysisParser {
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            classifier: RowClassifier::new(config.max_coefficient, config.max_unit_len),
            skip_markers: config
                .skip_markers
                .iter()
                .map(|m| m.trim().to_uppercase())
                .filter(|m| !m.is_empty())
                .collect(),
            delimiter: config.delimiter_byte(),
            max_file_bytes: config.max_file_bytes,
        }
    }

    /// 从 CSV 原始字节解析
    pub fn parse_analysis(&self, raw_bytes: &[u8]) -> ImportResult<ParsedAnalysis> {
        check_upload_size("analysis", raw_bytes, self.max_file_bytes)?;
        let rows = CsvParser::new(self.delimiter).parse_rows(raw_bytes)?;
        Ok(self.parse_rows(&rows))
    }

    /// 模板行: 大写拼接后包含任一标记
    fn is_boilerplate(&self, joined_upper: &str) -> bool {
        self.skip_markers
            .iter()
            .any(|m| joined_upper.contains(m.as_str()))
    }
}

impl Default for HeuristicAnalysisParser {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl AnalysisParser for HeuristicAnalysisParser {
    fn parse_rows(&self, rows: &[Vec<String>]) -> ParsedAnalysis {
        let mut jobs = JobMap::new();
        let mut stats = ParseStats::default();
        let mut state = ParserState::Seeking;

        for (line_idx, fields) in rows.iter().enumerate() {
            stats.lines_total += 1;

            // === 作业表头（任意状态） ===
            if let Some((id, title)) = detect_job_header(fields) {
                stats.job_headers += 1;
                trace!(line = line_idx + 1, id = %id, title = %title, "识别到作业表头");
                if let ParserState::Capturing(open) = state {
                    commit(open, &mut jobs, &mut stats);
                }
                state = ParserState::Capturing(OpenJob::new(id, title));
                continue;
            }

            let open = match &mut state {
                ParserState::Seeking => continue,
                ParserState::Capturing(open) => open,
            };

            // === 模板行过滤 ===
            if fields.iter().all(|f| f.trim().is_empty()) {
                stats.skipped_lines += 1;
                continue;
            }
            let joined_upper = fields.join(" ").to_uppercase();
            if self.is_boilerplate(&joined_upper) {
                // 分段标签决定后续分项类别, 合计行不改变类别
                if !joined_upper.contains("JUMLAH") {
                    if let Some(category) = ComponentCategory::from_section_label(&joined_upper) {
                        open.category = category;
                    }
                }
                stats.skipped_lines += 1;
                continue;
            }

            // === 分项提取 ===
            match self.classifier.match_component(fields) {
                Some(shape) => {
                    open.components.push(Component {
                        name: shape.name,
                        code: shape.code,
                        unit: shape.unit,
                        coefficient: shape.coefficient,
                        category: open.category,
                    });
                    stats.components += 1;
                }
                None => {
                    trace!(line = line_idx + 1, "行无法识别为分项，已丢弃");
                    stats.dropped_rows += 1;
                }
            }
        }

        // 输入结束: 提交未关闭的作业
        if let ParserState::Capturing(open) = state {
            commit(open, &mut jobs, &mut stats);
        }

        info!(
            jobs = jobs.len(),
            components = stats.components,
            dropped = stats.dropped_rows,
            discarded_empty_jobs = stats.discarded_empty_jobs,
            "分析表解析完成"
        );
        ParsedAnalysis { jobs, stats }
    }
}

/// 提交作业（无分项时丢弃）
fn commit(open: OpenJob, jobs: &mut JobMap, stats: &mut ParseStats) {
    if open.components.is_empty() {
        debug!(id = %open.id, title = %open.title, "作业无分项，已丢弃");
        stats.discarded_empty_jobs += 1;
        return;
    }
    jobs.insert(Job {
        id: open.id,
        title: open.title,
        components: open.components,
    });
}
