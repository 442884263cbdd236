// ==========================================
// AHSP RAB 计算核心 - RAB 汇总引擎
// ==========================================
// 输入: 工程量条目 + 作业表 + 价格索引
// 输出: RabReport（每行 = HSP * 工程量）
// 红线: volume <= 0 的行不计入 lines 与 total_proyek
// ==========================================

use crate::domain::{Job, JobAnalysis, JobMap, PriceIndex, RabLine, RabReport, VolumeEntry};
use crate::engine::hsp_calculator::{category_subtotals, compute_job_cost, with_volume};
use crate::engine::price_resolver::PriceResolver;
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 单个作业完整计价
///
/// # 参数
/// - job: 已解析作业
/// - volume: 工程量（0 表示只算单价）
pub fn price_job(
    job: &Job,
    index: &PriceIndex,
    resolver: &PriceResolver,
    overhead_rate: f64,
    volume: f64,
) -> JobAnalysis {
    let items = resolver.resolve_all(&job.components, index);
    let summary = with_volume(compute_job_cost(&items, overhead_rate), volume);
    let unmatched_count = items.iter().filter(|i| !i.match_kind.is_matched()).count();

    JobAnalysis {
        key: job.key(),
        job: job.clone(),
        category_subtotals: category_subtotals(&items),
        items,
        summary,
        unmatched_count,
    }
}

/// 批量生成 RAB
///
/// # 规则
/// - volume <= 0: 计入 excluded_rows
/// - 作业键不存在: 计入 missing_jobs
/// - total_proyek = Σ line.total
#[instrument(skip_all, fields(entries = entries.len(), jobs = jobs.len()))]
pub fn build_rab(
    entries: &[VolumeEntry],
    jobs: &JobMap,
    index: &PriceIndex,
    resolver: &PriceResolver,
    overhead_rate: f64,
) -> RabReport {
    let mut lines = Vec::new();
    let mut missing_jobs = Vec::new();
    let mut excluded_rows = 0usize;

    for entry in entries {
        if entry.volume <= 0.0 {
            excluded_rows += 1;
            continue;
        }

        let key = entry.job_key();
        let Some(job) = jobs.get(&key) else {
            warn!(row = entry.row_number, key = %key, "工程量表中的作业在分析表中不存在");
            missing_jobs.push(key);
            continue;
        };

        let analysis = price_job(job, index, resolver, overhead_rate, entry.volume);
        lines.push(RabLine {
            kode: entry.kode_analisa.clone(),
            uraian: entry.uraian_pekerjaan.clone(),
            volume: entry.volume,
            hsp: analysis.summary.unit_price,
            total: analysis.summary.project_total,
        });
    }

    let total_proyek: f64 = lines.iter().map(|l| l.total).sum();
    info!(
        lines = lines.len(),
        missing = missing_jobs.len(),
        excluded = excluded_rows,
        total_proyek = total_proyek,
        "RAB 汇总完成"
    );

    RabReport {
        run_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        overhead_rate,
        lines,
        missing_jobs,
        excluded_rows,
        total_proyek,
    }
}
