// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: JSON 文件加载 → 环境变量覆写 → 校验 → 会话生效
// ==========================================

mod helpers;

use ahsp_rab::config::{env_keys, ConfigError, ConfigManager};
use ahsp_rab::CalculationSession;
use helpers::{assert_close, fixture_upload, write_temp};

#[test]
fn test_load_partial_json_file() {
    let file = write_temp(".json", r#"{ "overhead_rate": 0.15, "header_scan_lines": 10 }"#);
    let manager = ConfigManager::from_json_file(file.path()).unwrap();
    let config = manager.config();

    assert_eq!(config.overhead_rate, 0.15);
    assert_eq!(config.header_scan_lines, 10);
    // 未写出的键使用默认值
    assert_eq!(config.partial_match_max_len_diff, 15);
    assert_eq!(config.price_header_keywords, vec!["KODE", "SATUAN"]);
}

#[test]
fn test_missing_config_file() {
    let result = ConfigManager::from_json_file("/tidak/ada/config.json");
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
}

#[test]
fn test_invalid_overhead_rate_rejected() {
    let file = write_temp(".json", r#"{ "overhead_rate": 1.5 }"#);
    let result = ConfigManager::from_json_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}

#[test]
fn test_overrides_take_precedence_over_file() {
    let file = write_temp(".json", r#"{ "overhead_rate": 0.15 }"#);
    let manager = ConfigManager::from_json_file(file.path())
        .unwrap()
        .with_overrides(|key| (key == env_keys::OVERHEAD_RATE).then(|| "0.12".to_string()))
        .unwrap();

    assert_eq!(manager.config().overhead_rate, 0.12);
}

#[test]
fn test_overhead_rate_flows_into_session() {
    let mut manager = ConfigManager::new();
    manager.set_overhead_rate(0.15).unwrap();

    let mut session = CalculationSession::new(manager.into_config());
    session.load_prices(&fixture_upload("harga.csv")).unwrap();
    session.add_analysis(&fixture_upload("analisa.csv")).unwrap();

    let analysis = session
        .analyze_job("1.1.1 - Pekerjaan Galian Tanah Biasa", 0.0)
        .unwrap();
    assert_close(analysis.summary.overhead_cost, 11_906.25);
    assert_close(analysis.summary.unit_price, 91_281.25);
}

#[test]
fn test_semicolon_delimiter() {
    let file = write_temp(".json", r#"{ "delimiter": ";" }"#);
    let config = ConfigManager::from_json_file(file.path()).unwrap().into_config();

    let mut session = CalculationSession::new(config);
    let index = session
        .load_prices(&helpers::upload_str(
            "harga.csv",
            "KODE;URAIAN;SATUAN;HARGA\nL.01;Pekerja;OH;100.000,00\n",
        ))
        .unwrap();
    assert_close(index.get_by_code("L.01").unwrap().unit_price, 100_000.0);
}
