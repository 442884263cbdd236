// ==========================================
// AHSP RAB 计算核心 - API 层错误类型
// ==========================================
// 职责: 汇总导入 / 配置 / 导出错误, 给调用方统一的错误出口
// 红线: 错误信息必须带显式原因（文件名 / 作业键 / 列名）
// ==========================================

use crate::config::ConfigError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 下层错误
    // ==========================================
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 会话状态错误
    // ==========================================
    #[error("尚未加载价格库，请先导入价格文件")]
    NoPriceDatabase,

    #[error("作业不存在: {0}")]
    JobNotFound(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导出错误
    // ==========================================
    #[error("文件写入失败: {0}")]
    Io(String),

    #[error("CSV 导出失败: {0}")]
    Csv(String),

    #[error("JSON 序列化失败: {0}")]
    Json(String),
}

impl ApiError {
    /// 是否为"未解析出任何作业"
    pub fn is_empty_job_set(&self) -> bool {
        matches!(self, ApiError::Import(ImportError::EmptyJobSet))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

impl From<csv::Error> for ApiError {
    fn from(err: csv::Error) -> Self {
        ApiError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Json(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::EmptyJobSet.into();
        assert!(err.is_empty_job_set());
        assert!(err.to_string().contains("未解析出任何有效作业"));
    }

    #[test]
    fn test_job_not_found_message() {
        let err = ApiError::JobNotFound("9.9.9 - Tidak Ada".to_string());
        assert_eq!(err.to_string(), "作业不存在: 9.9.9 - Tidak Ada");
    }
}
