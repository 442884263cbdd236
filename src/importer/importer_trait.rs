// ==========================================
// AHSP RAB 计算核心 - 导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 原始字节 → 行网格 → 价格索引 / 作业表
// ==========================================

use crate::domain::{ParsedAnalysis, PriceIndex};
use crate::importer::error::ImportResult;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析原始字节为行网格（每个字段已 TRIM）
    ///
    /// # 参数
    /// - bytes: 上传文件内容
    ///
    /// # 返回
    /// - Ok(Vec<Vec<String>>): 行列表, 行长度可不一致
    /// - Err: 文件级格式错误
    fn parse_rows(&self, bytes: &[u8]) -> ImportResult<Vec<Vec<String>>>;
}

// ==========================================
// PriceLoader Trait
// ==========================================
// 用途: 价格库加载接口（阶段 1a）
// 实现者: PriceDatabaseLoader
pub trait PriceLoader: Send + Sync {
    /// 从行网格构建价格双索引
    ///
    /// # 返回
    /// - Ok(PriceIndex): 按代码 / 按小写名称索引
    /// - Err(HeaderNotFound): 扫描范围内无表头
    /// - Err(MissingColumn): 表头缺少名称列
    fn load_from_rows(&self, rows: &[Vec<String>]) -> ImportResult<PriceIndex>;
}

// ==========================================
// AnalysisParser Trait
// ==========================================
// 用途: 分析表解析接口（阶段 1b）
// 实现者: HeuristicAnalysisParser, StructuredAnalysisParser
pub trait AnalysisParser: Send + Sync {
    /// 从行网格重建作业 → 分项列表
    ///
    /// # 说明
    /// - 行级异常就地丢弃, 只计入 ParseStats
    /// - 无分项的作业不出现在结果中
    fn parse_rows(&self, rows: &[Vec<String>]) -> ParsedAnalysis;
}
