// ==========================================
// AHSP RAB 计算核心 - 结果导出
// ==========================================
// 支持: 分项明细 CSV / RAB CSV / BoQ 模板 CSV / JSON
// 列名使用印尼语, 与常见 AHSP 表格保持一致
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::{JobAnalysis, JobMap, RabReport};
use crate::importer::volume_loader::{COL_KODE, COL_URAIAN, COL_VOLUME};
use serde::Serialize;
use std::io::Write;

pub const LINE_ITEM_HEADERS: [&str; 8] = [
    "Kategori",
    "Kode",
    "Uraian",
    "Satuan",
    "Koefisien",
    "Harga Satuan (Rp)",
    "Jumlah Harga (Rp)",
    "Status",
];

pub const RAB_HEADERS: [&str; 5] = [
    "Kode",
    "Uraian Pekerjaan",
    "Volume",
    "HSP (Rp)",
    "Total Harga (Rp)",
];

/// 分项明细 CSV（每个分项一行）
pub fn write_line_items_csv<W: Write>(writer: W, analysis: &JobAnalysis) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LINE_ITEM_HEADERS)?;

    for item in &analysis.items {
        let c = &item.component;
        wtr.write_record([
            c.category.label().to_string(),
            c.code.clone().unwrap_or_default(),
            c.name.clone(),
            c.unit.clone(),
            c.coefficient.to_string(),
            format!("{:.2}", item.unit_price),
            format!("{:.2}", item.line_total),
            item.match_kind.status_label().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// RAB CSV（每个工程量行一行）
pub fn write_rab_csv<W: Write>(writer: W, report: &RabReport) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(RAB_HEADERS)?;

    for line in &report.lines {
        wtr.write_record([
            line.kode.clone(),
            line.uraian.clone(),
            line.volume.to_string(),
            format!("{:.2}", line.hsp),
            format!("{:.2}", line.total),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// BoQ 模板 CSV（已解析作业, 工程量预填 0）
pub fn write_volume_template_csv<W: Write>(writer: W, jobs: &JobMap) -> ApiResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([COL_KODE, COL_URAIAN, COL_VOLUME])?;

    for job in jobs.iter() {
        wtr.write_record([job.id.as_str(), job.title.as_str(), "0"])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 任意结果 → 带缩进的 JSON
pub fn to_json<T: Serialize>(value: &T) -> ApiResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// 金额显示: Rp 1.234.567,89
pub fn format_rupiah(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}Rp {},{:02}", sign, grouped, cents % 100)
}
