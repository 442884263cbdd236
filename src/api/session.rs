// ==========================================
// AHSP RAB 计算核心 - 计算会话
// ==========================================
// 职责: 持有一次计算所需的全部状态（配置 / 价格库 / 作业表）
// 流程: load_prices → add_analysis（可多次） → analyze_job / build_rab
// 红线: 会话状态由调用方显式持有, 不使用全局变量
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::CalculatorConfig;
use crate::domain::{JobAnalysis, JobMap, ParseStats, PriceIndex, RabReport, VolumeEntry};
use crate::engine::{build_rab, price_job, PriceResolver};
use crate::importer::structured_parser::parse_any_analysis;
use crate::importer::{
    ImportError, PriceDatabaseLoader, PriceLoader, UniversalFileParser, Upload, VolumeLoader,
};
use tracing::{info, instrument, warn};

// ==========================================
// CalculationSession - 计算会话
// ==========================================
pub struct CalculationSession {
    config: CalculatorConfig,
    prices: Option<PriceIndex>,
    jobs: JobMap,
    stats: ParseStats,
}

impl CalculationSession {
    pub fn new(config: CalculatorConfig) -> Self {
        Self {
            config,
            prices: None,
            jobs: JobMap::new(),
            stats: ParseStats::default(),
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 加载价格库（替换已加载的价格库）
    ///
    /// # 返回
    /// - Ok(&PriceIndex): 新价格索引
    /// - Err(Import(HeaderNotFound / MissingColumn / ...))
    #[instrument(skip(self, upload), fields(file = %upload.name))]
    pub fn load_prices(&mut self, upload: &Upload) -> ApiResult<&PriceIndex> {
        let rows = UniversalFileParser::new(&self.config).parse(upload)?;
        let index = PriceDatabaseLoader::new(&self.config).load_from_rows(&rows)?;
        info!(file = %upload.name, records = index.record_count(), "价格库已加载");
        Ok(self.prices.insert(index))
    }

    /// 追加分析表（多个文件按加载顺序合并, 同键后者覆盖）
    ///
    /// 首行为结构化表头时使用 StructuredAnalysisParser, 否则使用启发式解析器
    ///
    /// # 返回
    /// - Ok(ParseStats): 本文件的解析统计
    #[instrument(skip(self, upload), fields(file = %upload.name))]
    pub fn add_analysis(&mut self, upload: &Upload) -> ApiResult<ParseStats> {
        let rows = UniversalFileParser::new(&self.config).parse(upload)?;
        let parsed = parse_any_analysis(&rows, &self.config);

        if parsed.jobs.is_empty() {
            warn!(file = %upload.name, "分析表未解析出任何作业");
        }
        let overwritten = self.jobs.merge(parsed.jobs);
        if overwritten > 0 {
            warn!(file = %upload.name, overwritten = overwritten, "同名作业已被后加载的文件覆盖");
        }
        self.stats.absorb(&parsed.stats);
        Ok(parsed.stats)
    }

    /// 读取工程量表
    #[instrument(skip(self, upload), fields(file = %upload.name))]
    pub fn load_volumes(&self, upload: &Upload) -> ApiResult<Vec<VolumeEntry>> {
        let rows = UniversalFileParser::new(&self.config).parse(upload)?;
        Ok(VolumeLoader.load_from_rows(&rows)?)
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn prices(&self) -> ApiResult<&PriceIndex> {
        self.prices.as_ref().ok_or(ApiError::NoPriceDatabase)
    }

    pub fn jobs(&self) -> &JobMap {
        &self.jobs
    }

    /// 至少有一个作业, 否则 EmptyJobSet
    pub fn require_jobs(&self) -> ApiResult<&JobMap> {
        if self.jobs.is_empty() {
            return Err(ImportError::EmptyJobSet.into());
        }
        Ok(&self.jobs)
    }

    /// 所有分析表的累计解析统计
    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// 作业键（按首次加载顺序）
    pub fn job_keys(&self) -> Vec<String> {
        self.jobs.keys().map(str::to_string).collect()
    }

    // ==========================================
    // 计算
    // ==========================================

    /// 单个作业计价
    ///
    /// # 参数
    /// - key: 作业键 "{编号} - {标题}"
    /// - volume: 工程量（0 表示只算 HSP）
    #[instrument(skip(self))]
    pub fn analyze_job(&self, key: &str, volume: f64) -> ApiResult<JobAnalysis> {
        let index = self.prices()?;
        let jobs = self.require_jobs()?;
        let job = jobs
            .get(key)
            .ok_or_else(|| ApiError::JobNotFound(key.to_string()))?;

        let analysis = price_job(job, index, &self.resolver(), self.config.overhead_rate, volume);
        info!(
            key = %key,
            hsp = analysis.summary.unit_price,
            unmatched = analysis.unmatched_count,
            "作业计价完成"
        );
        Ok(analysis)
    }

    /// 批量 RAB
    #[instrument(skip(self, upload), fields(file = %upload.name))]
    pub fn build_rab(&self, upload: &Upload) -> ApiResult<RabReport> {
        let index = self.prices()?;
        let jobs = self.require_jobs()?;
        let entries = self.load_volumes(upload)?;
        Ok(build_rab(&entries, jobs, index, &self.resolver(), self.config.overhead_rate))
    }

    fn resolver(&self) -> PriceResolver {
        PriceResolver::new(self.config.partial_match_max_len_diff)
    }
}

impl Default for CalculationSession {
    fn default() -> Self {
        Self::new(CalculatorConfig::default())
    }
}
