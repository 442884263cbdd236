// ==========================================
// AHSP RAB 计算核心 - 导入层
// ==========================================
// 职责: 外部文件 → 内部领域数据
// 管道: 字节 → 行网格 → 价格索引 / 作业表 / 工程量条目
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod analysis_parser;
pub mod error;
pub mod file_parser;
pub mod importer_trait;
pub mod number_parser;
pub mod price_loader;
pub mod row_classifier;
pub mod structured_parser;
pub mod volume_loader;

// 重导出核心类型
pub use analysis_parser::HeuristicAnalysisParser;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser, Upload};
pub use number_parser::{
    parse_indo_number, parse_plain_number, try_parse_coefficient, try_parse_indo_number,
};
pub use price_loader::{ColumnMapping, PriceDatabaseLoader};
pub use row_classifier::RowClassifier;
pub use structured_parser::StructuredAnalysisParser;
pub use volume_loader::VolumeLoader;

// 重导出 Trait 接口
pub use importer_trait::{AnalysisParser, FileParser, PriceLoader};
