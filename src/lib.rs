// ==========================================
// AHSP RAB 计算核心 - 核心库
// ==========================================
// 职责: 价格库 + AHSP 分析表 → 单价（HSP）→ 预算（RAB）
// 技术栈: Rust + csv + calamine
// 系统定位: 批处理计算核心（无持久化, 无界面）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部文件
pub mod importer;

// 引擎层 - 计价规则
pub mod engine;

// 配置层 - 计算参数
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 会话与导出
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ComponentCategory, MatchKind};

// 领域实体
pub use domain::{
    Component, CostSummary, Job, JobAnalysis, JobMap, ParseStats, PriceIndex, PriceRecord,
    RabLine, RabReport, ResolvedLineItem, VolumeEntry,
};

// 引擎
pub use engine::PriceResolver;

// 配置
pub use config::{CalculatorConfig, ConfigManager};

// API
pub use api::{ApiError, ApiResult, CalculationSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "AHSP RAB 计算器";
