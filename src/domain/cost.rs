// ==========================================
// AHSP RAB 计算核心 - 计价结果领域模型
// ==========================================
// 职责: ResolvedLineItem / CostSummary / JobAnalysis / VolumeEntry / RabReport
// 用途: 引擎层写入, 展示层只读
// ==========================================

use crate::domain::analysis::{job_key, Component, Job};
use crate::domain::types::{ComponentCategory, MatchKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ResolvedLineItem - 已定价分项
// ==========================================
// line_total = coefficient * unit_price
// 未匹配: unit_price = 0, match_kind = Unmatched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLineItem {
    pub component: Component,
    pub unit_price: f64,
    pub match_kind: MatchKind,
    pub matched_name: Option<String>, // 命中的价格记录名称（诊断用）
    pub line_total: f64,
}

// ==========================================
// CostSummary - 单价汇总
// ==========================================
// overhead_cost = base_cost * overhead_rate
// unit_price    = base_cost + overhead_cost  (HSP)
// project_total = unit_price * volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub base_cost: f64,
    pub overhead_rate: f64,
    pub overhead_cost: f64,
    pub unit_price: f64,
    pub volume: f64,
    pub project_total: f64,
}

// ==========================================
// CategorySubtotal - 分段小计（A 人工 / B 材料 / C 机械）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySubtotal {
    pub category: ComponentCategory,
    pub total: f64,
}

// ==========================================
// JobAnalysis - 单个作业的完整计价
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub key: String,
    pub job: Job,
    pub items: Vec<ResolvedLineItem>,
    pub category_subtotals: Vec<CategorySubtotal>,
    pub summary: CostSummary,
    pub unmatched_count: usize,
}

// ==========================================
// VolumeEntry - BoQ 行（Kode_Analisa, Uraian_Pekerjaan, Volume）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub kode_analisa: String,
    pub uraian_pekerjaan: String,
    pub volume: f64,
    pub row_number: usize, // 原始文件行号（表头之后从 1 计）
}

impl VolumeEntry {
    /// 回查作业用的键
    pub fn job_key(&self) -> String {
        job_key(&self.kode_analisa, &self.uraian_pekerjaan)
    }
}

// ==========================================
// RabLine / RabReport - 批量预算汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RabLine {
    pub kode: String,
    pub uraian: String,
    pub volume: f64,
    pub hsp: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RabReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub overhead_rate: f64,
    pub lines: Vec<RabLine>,
    pub missing_jobs: Vec<String>, // BoQ 中有、分析表中找不到的作业键
    pub excluded_rows: usize,      // volume <= 0 被排除的行数
    pub total_proyek: f64,
}
