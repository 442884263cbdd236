// ==========================================
// AHSP RAB 计算核心 - 领域模型层
// ==========================================
// 职责: 定义价格库、分析表、计价结果实体
// 红线: 不含文件解析逻辑, 不含计价逻辑
// ==========================================

pub mod analysis;
pub mod cost;
pub mod price;
pub mod types;

// 重导出核心类型
pub use analysis::{job_key, Component, Job, JobMap, ParseStats, ParsedAnalysis};
pub use cost::{
    CategorySubtotal, CostSummary, JobAnalysis, RabLine, RabReport, ResolvedLineItem,
    VolumeEntry,
};
pub use price::{PriceIndex, PriceRecord};
pub use types::{ComponentCategory, MatchKind};
