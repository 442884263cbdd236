// ==========================================
// AHSP RAB 计算核心 - 引擎层
// ==========================================
// 职责: 价格匹配 → HSP 计算 → RAB 汇总
// 红线: 引擎只做纯计算, 不读文件
// ==========================================

pub mod hsp_calculator;
pub mod price_resolver;
pub mod rab_builder;

// 重导出核心引擎
pub use hsp_calculator::{category_subtotals, compute_job_cost, compute_project_cost, with_volume};
pub use price_resolver::PriceResolver;
pub use rab_builder::{build_rab, price_job};
