// ==========================================
// AHSP RAB 计算核心 - 配置层
// ==========================================
// 职责: 管道参数（表头关键字、模板行标记、管理费率、文件上限）
// 存储: JSON 文件 + 环境变量, 不落库
// ==========================================

pub mod calculator_config;
pub mod config_manager;

// 重导出核心配置管理器
pub use calculator_config::CalculatorConfig;
pub use config_manager::{config_keys, env_keys, ConfigError, ConfigManager};
