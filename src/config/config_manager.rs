// ==========================================
// AHSP RAB 计算核心 - 配置管理器
// ==========================================
// 职责: 配置加载（JSON 文件）、环境变量覆写、校验
// 优先级: 环境变量 > 配置文件 > 默认值
// ==========================================

use crate::config::calculator_config::CalculatorConfig;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置解析失败: {0}")]
    ParseError(String),

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: CalculatorConfig,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有配置创建（会做一次校验）
    pub fn from_config(config: CalculatorConfig) -> Result<Self, ConfigError> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    ///
    /// # 返回
    /// - Ok(ConfigManager): 加载并校验通过
    /// - Err(ConfigError): 读取/解析/校验失败
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let manager = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "配置文件加载完成");
        Ok(manager)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: CalculatorConfig =
            serde_json::from_str(raw).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Self::from_config(config)
    }

    /// 应用环境变量覆写
    ///
    /// # 环境变量
    /// - AHSP_OVERHEAD_RATE: 管理费率（如 0.15）
    /// - AHSP_MAX_FILE_BYTES: 单文件字节上限
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 以任意来源覆写（便于测试注入）
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(env_keys::OVERHEAD_RATE) {
            self.config.overhead_rate =
                parse_value(config_keys::OVERHEAD_RATE, &raw, |v| v.parse::<f64>().ok())?;
            debug!(overhead_rate = self.config.overhead_rate, "环境变量覆写管理费率");
        }
        if let Some(raw) = lookup(env_keys::MAX_FILE_BYTES) {
            self.config.max_file_bytes =
                parse_value(config_keys::MAX_FILE_BYTES, &raw, |v| v.parse::<usize>().ok())?;
            debug!(max_file_bytes = self.config.max_file_bytes, "环境变量覆写文件上限");
        }
        validate(&self.config)?;
        Ok(self)
    }

    /// 覆写管理费率（命令行参数）
    pub fn set_overhead_rate(&mut self, rate: f64) -> Result<(), ConfigError> {
        check_overhead_rate(rate)?;
        self.config.overhead_rate = rate;
        Ok(())
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn into_config(self) -> CalculatorConfig {
        self.config
    }

    /// 获取配置快照（JSON 格式，写入报告以便追溯）
    pub fn get_config_snapshot(&self) -> Result<String, ConfigError> {
        serde_json::to_string(&self.config).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

fn parse_value<T, F>(key: &str, raw: &str, parse: F) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<T>,
{
    parse(raw.trim()).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
        message: "无法解析".to_string(),
    })
}

fn check_overhead_rate(rate: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidValue {
            key: config_keys::OVERHEAD_RATE.to_string(),
            value: rate.to_string(),
            message: "管理费率必须在 [0, 1] 区间".to_string(),
        });
    }
    Ok(())
}

fn check_positive(key: &str, value: f64) -> Result<(), ConfigError> {
    if value <= 0.0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: "必须为正数".to_string(),
        });
    }
    Ok(())
}

/// 校验配置
fn validate(config: &CalculatorConfig) -> Result<(), ConfigError> {
    check_overhead_rate(config.overhead_rate)?;
    check_positive(config_keys::HEADER_SCAN_LINES, config.header_scan_lines as f64)?;
    check_positive(config_keys::MAX_COEFFICIENT, config.max_coefficient)?;
    check_positive(config_keys::MAX_UNIT_LEN, config.max_unit_len as f64)?;
    check_positive(config_keys::MAX_FILE_BYTES, config.max_file_bytes as f64)?;

    if config.price_header_keywords.iter().all(|k| k.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            key: config_keys::PRICE_HEADER_KEYWORDS.to_string(),
            value: format!("{:?}", config.price_header_keywords),
            message: "至少需要一个表头关键字".to_string(),
        });
    }
    Ok(())
}

// ==========================================
// 配置键常量（与 JSON 字段名一致）
// ==========================================
pub mod config_keys {
    pub const OVERHEAD_RATE: &str = "overhead_rate";
    pub const HEADER_SCAN_LINES: &str = "header_scan_lines";
    pub const PRICE_HEADER_KEYWORDS: &str = "price_header_keywords";
    pub const SKIP_MARKERS: &str = "skip_markers";
    pub const PARTIAL_MATCH_MAX_LEN_DIFF: &str = "partial_match_max_len_diff";
    pub const MAX_COEFFICIENT: &str = "max_coefficient";
    pub const MAX_UNIT_LEN: &str = "max_unit_len";
    pub const MAX_FILE_BYTES: &str = "max_file_bytes";
    pub const DELIMITER: &str = "delimiter";
}

// ==========================================
// 环境变量名
// ==========================================
pub mod env_keys {
    pub const OVERHEAD_RATE: &str = "AHSP_OVERHEAD_RATE";
    pub const MAX_FILE_BYTES: &str = "AHSP_MAX_FILE_BYTES";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let manager = ConfigManager::new();
        let config = manager.config();
        assert_eq!(config.overhead_rate, 0.10);
        assert_eq!(config.header_scan_lines, 30);
        assert_eq!(config.partial_match_max_len_diff, 15);
        assert!(config.skip_markers.iter().any(|m| m == "HARGA SATUAN"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let manager = ConfigManager::from_json_str(r#"{"overhead_rate": 0.15}"#).unwrap();
        assert_eq!(manager.config().overhead_rate, 0.15);
        assert_eq!(manager.config().max_unit_len, 8);
    }

    #[test]
    fn test_invalid_overhead_rate_rejected() {
        let result = ConfigManager::from_json_str(r#"{"overhead_rate": 1.5}"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_overrides_applied() {
        let mut vars = HashMap::new();
        vars.insert(env_keys::OVERHEAD_RATE, "0.12".to_string());

        let manager = ConfigManager::new()
            .with_overrides(|k| vars.get(k).cloned())
            .unwrap();
        assert_eq!(manager.config().overhead_rate, 0.12);
    }

    #[test]
    fn test_override_unparsable() {
        let result = ConfigManager::new().with_overrides(|k| {
            (k == env_keys::MAX_FILE_BYTES).then(|| "banyak".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let manager = ConfigManager::new();
        let snapshot = manager.get_config_snapshot().unwrap();
        let restored = ConfigManager::from_json_str(&snapshot).unwrap();
        assert_eq!(restored.config(), manager.config());
    }
}
