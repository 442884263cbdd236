// ==========================================
// AHSP RAB 计算核心 - 命令行入口
// ==========================================
// 用法: ahsp-rab [--config FILE] [--overhead RATE] <命令>
// 输出: 结果写 stdout（文本 / JSON）或 --csv 指定文件, 日志写 stderr
// ==========================================

use ahsp_rab::api::{
    format_rupiah, to_json, write_line_items_csv, write_rab_csv, write_volume_template_csv,
};
use ahsp_rab::importer::Upload;
use ahsp_rab::{logging, CalculationSession, ConfigManager, JobAnalysis, RabReport};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// AHSP 单价分析与 RAB 预算计算器
#[derive(Parser)]
#[command(name = "ahsp-rab", version, about = "AHSP 单价分析与 RAB 预算计算器")]
struct Cli {
    /// JSON 配置文件（缺省使用内置默认值）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 管理费率, 覆盖配置文件与环境变量（如 0.15）
    #[arg(long, global = true)]
    overhead: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 加载价格库并输出统计
    Prices {
        /// 价格文件（.csv / .xlsx）
        file: PathBuf,
    },

    /// 解析分析表并列出作业
    Jobs {
        /// 分析文件, 可多个（同名作业后者覆盖）
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// 计算单个作业的 HSP
    Hsp {
        #[arg(long)]
        prices: PathBuf,

        #[arg(long, required = true, num_args = 1..)]
        analysis: Vec<PathBuf>,

        /// 作业键 "编号 - 标题"
        #[arg(long)]
        job: String,

        /// 工程量
        #[arg(long, default_value_t = 0.0)]
        volume: f64,

        /// 分项明细 CSV 输出路径
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 按工程量表批量生成 RAB
    Rab {
        #[arg(long)]
        prices: PathBuf,

        #[arg(long, required = true, num_args = 1..)]
        analysis: Vec<PathBuf>,

        /// 工程量表（Kode_Analisa, Uraian_Pekerjaan, Volume）
        #[arg(long)]
        volumes: PathBuf,

        /// RAB CSV 输出路径
        #[arg(long)]
        csv: Option<PathBuf>,

        /// 以 JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 生成工程量表模板
    Template {
        #[arg(long, required = true, num_args = 1..)]
        analysis: Vec<PathBuf>,

        /// 输出路径（缺省写 stdout）
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut manager = match &cli.config {
        Some(path) => ConfigManager::from_json_file(path)?,
        None => ConfigManager::new(),
    }
    .with_env_overrides()?;
    if let Some(rate) = cli.overhead {
        manager.set_overhead_rate(rate)?;
    }
    let snapshot = manager.get_config_snapshot()?;
    tracing::debug!(config = %snapshot, "配置已生效");

    let mut session = CalculationSession::new(manager.into_config());

    match cli.command {
        Commands::Prices { file } => {
            let index = session.load_prices(&upload(&session, &file)?)?;
            println!("Jumlah harga : {}", index.record_count());
            println!("Indeks nama  : {}", index.len());
            println!("Indeks kode  : {}", index.code_count());
        }

        Commands::Jobs { files } => {
            add_analyses(&mut session, &files)?;
            let jobs = session.require_jobs()?;
            for job in jobs.iter() {
                println!("{}  ({} komponen)", job.key(), job.components.len());
            }
            let stats = session.stats();
            println!(
                "{} pekerjaan, {} komponen, {} baris dibuang, {} pekerjaan kosong",
                jobs.len(),
                stats.components,
                stats.dropped_rows,
                stats.discarded_empty_jobs
            );
        }

        Commands::Hsp {
            prices,
            analysis,
            job,
            volume,
            csv,
            json,
        } => {
            session.load_prices(&upload(&session, &prices)?)?;
            add_analyses(&mut session, &analysis)?;
            let result = session.analyze_job(&job, volume)?;

            if let Some(path) = &csv {
                write_line_items_csv(create(path)?, &result)?;
                tracing::info!(path = %path.display(), "分项明细已导出");
            }
            if json {
                println!("{}", to_json(&result)?);
            } else {
                print_job_analysis(&result);
            }
        }

        Commands::Rab {
            prices,
            analysis,
            volumes,
            csv,
            json,
        } => {
            session.load_prices(&upload(&session, &prices)?)?;
            add_analyses(&mut session, &analysis)?;
            let report = session.build_rab(&upload(&session, &volumes)?)?;

            if let Some(path) = &csv {
                write_rab_csv(create(path)?, &report)?;
                tracing::info!(path = %path.display(), "RAB 已导出");
            }
            if json {
                println!("{}", to_json(&report)?);
            } else {
                print_rab(&report);
            }
        }

        Commands::Template { analysis, out } => {
            add_analyses(&mut session, &analysis)?;
            let jobs = session.require_jobs()?;
            match &out {
                Some(path) => write_volume_template_csv(create(path)?, jobs)?,
                None => write_volume_template_csv(std::io::stdout().lock(), jobs)?,
            }
        }
    }

    Ok(())
}

fn upload(session: &CalculationSession, path: &Path) -> Result<Upload> {
    Upload::from_path(path, session.config().max_file_bytes)
        .with_context(|| format!("无法读取文件: {}", path.display()))
}

fn add_analyses(session: &mut CalculationSession, files: &[PathBuf]) -> Result<()> {
    for path in files {
        let file = upload(session, path)?;
        session
            .add_analysis(&file)
            .with_context(|| format!("分析表解析失败: {}", path.display()))?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("无法创建文件: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn print_job_analysis(result: &JobAnalysis) {
    println!("{}", result.key);
    for item in &result.items {
        let c = &item.component;
        println!(
            "  [{}] {:<30} {:>8} {:>10} x {:>18} = {:>18}  {}",
            c.category.label(),
            c.name,
            c.unit,
            c.coefficient,
            format_rupiah(item.unit_price),
            format_rupiah(item.line_total),
            item.match_kind.status_label()
        );
    }
    for subtotal in &result.category_subtotals {
        println!("  Jumlah {:<8} {}", subtotal.category.label(), format_rupiah(subtotal.total));
    }

    let s = &result.summary;
    println!("Jumlah (A+B+C)      : {}", format_rupiah(s.base_cost));
    println!(
        "Overhead & Profit {:>3}%: {}",
        (s.overhead_rate * 100.0).round(),
        format_rupiah(s.overhead_cost)
    );
    println!("Harga Satuan (HSP)  : {}", format_rupiah(s.unit_price));
    if s.volume != 0.0 {
        println!("Volume {} -> Total  : {}", s.volume, format_rupiah(s.project_total));
    }
    if result.unmatched_count > 0 {
        println!("Peringatan: {} komponen tidak ditemukan di database harga", result.unmatched_count);
    }
}

fn print_rab(report: &RabReport) {
    for line in &report.lines {
        println!(
            "{:<12} {:<40} {:>10} {:>20} {:>22}",
            line.kode,
            line.uraian,
            line.volume,
            format_rupiah(line.hsp),
            format_rupiah(line.total)
        );
    }
    println!("TOTAL PROYEK: {}", format_rupiah(report.total_proyek));
    if report.excluded_rows > 0 {
        println!("{} baris dengan volume <= 0 tidak dihitung", report.excluded_rows);
    }
    for key in &report.missing_jobs {
        println!("Tidak ditemukan di analisa: {}", key);
    }
}
