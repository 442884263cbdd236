// ==========================================
// AHSP RAB 计算核心 - API 层
// ==========================================
// 职责: 提供会话式计算接口与结果导出, 供 CLI 调用
// ==========================================

pub mod error;
pub mod export;
pub mod session;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use export::{
    format_rupiah, to_json, write_line_items_csv, write_rab_csv, write_volume_template_csv,
};
pub use session::CalculationSession;
