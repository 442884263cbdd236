// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 固定样例文件定位、临时文件生成、会话构建
// ==========================================

#![allow(dead_code)]

use ahsp_rab::importer::Upload;
use ahsp_rab::{CalculationSession, CalculatorConfig};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// tests/fixtures 下的样例文件路径
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 读取样例文件为 Upload
pub fn fixture_upload(name: &str) -> Upload {
    Upload::from_path(fixture_path(name), 1024 * 1024).unwrap()
}

/// 内存字符串 → Upload
pub fn upload_str(name: &str, content: &str) -> Upload {
    Upload::new(name, content.as_bytes().to_vec())
}

/// 写入临时文件（需要保持存活）
pub fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

// ==========================================
// SessionBuilder - 会话构建器
// ==========================================

pub struct SessionBuilder {
    config: CalculatorConfig,
    prices: Option<Upload>,
    analyses: Vec<Upload>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: CalculatorConfig::default(),
            prices: None,
            analyses: Vec::new(),
        }
    }

    pub fn overhead_rate(mut self, rate: f64) -> Self {
        self.config.overhead_rate = rate;
        self
    }

    pub fn prices(mut self, upload: Upload) -> Self {
        self.prices = Some(upload);
        self
    }

    pub fn analysis(mut self, upload: Upload) -> Self {
        self.analyses.push(upload);
        self
    }

    pub fn build(self) -> CalculationSession {
        let mut session = CalculationSession::new(self.config);
        if let Some(prices) = &self.prices {
            session.load_prices(prices).unwrap();
        }
        for analysis in &self.analyses {
            session.add_analysis(analysis).unwrap();
        }
        session
    }
}

/// 浮点近似相等
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {}, got {}",
        expected,
        actual
    );
}
