// ==========================================
// AHSP RAB 计算核心 - 工程量表（BoQ）加载器
// ==========================================
// 表头: Kode_Analisa, Uraian_Pekerjaan, Volume（TRIM 后大小写不敏感）
// 红线: 缺列为文件级错误; 坏数字按 0 处理, 交给 RabBuilder 排除
// 工程量按普通小数读取（模板与 RAB 导出都写 "2.5"）, 不走印尼千位规则
// ==========================================

use crate::domain::VolumeEntry;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::number_parser::parse_plain_number;
use tracing::{debug, info};

pub const COL_KODE: &str = "Kode_Analisa";
pub const COL_URAIAN: &str = "Uraian_Pekerjaan";
pub const COL_VOLUME: &str = "Volume";

// ==========================================
// VolumeLoader - 工程量表加载器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct VolumeLoader;

impl VolumeLoader {
    /// 从行网格读取工程量条目
    ///
    /// # 参数
    /// - rows: 首行为表头
    ///
    /// # 返回
    /// - Ok(Vec<VolumeEntry>): 保持文件顺序
    /// - Err(MissingColumn): 表头缺少任一必需列
    pub fn load_from_rows(&self, rows: &[Vec<String>]) -> ImportResult<Vec<VolumeEntry>> {
        let header = rows
            .first()
            .ok_or_else(|| ImportError::EmptyInput("volume".to_string()))?;

        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
        };
        let kode_col = position(COL_KODE)?;
        let uraian_col = position(COL_URAIAN)?;
        let volume_col = position(COL_VOLUME)?;

        let mut entries = Vec::new();
        let mut skipped = 0usize;
        for (idx, row) in rows.iter().enumerate().skip(1) {
            let get = |col: usize| row.get(col).map(|v| v.trim()).unwrap_or("");
            let kode = get(kode_col);
            let uraian = get(uraian_col);
            if kode.is_empty() && uraian.is_empty() {
                skipped += 1;
                continue;
            }

            entries.push(VolumeEntry {
                kode_analisa: kode.to_string(),
                uraian_pekerjaan: uraian.to_string(),
                volume: parse_plain_number(get(volume_col)),
                row_number: idx,
            });
        }

        debug!(skipped = skipped, "工程量表空行已跳过");
        info!(entries = entries.len(), "工程量表加载完成");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::CsvParser;
    use crate::importer::importer_trait::FileParser;

    fn load(csv: &str) -> ImportResult<Vec<VolumeEntry>> {
        let rows = CsvParser::default().parse_rows(csv.as_bytes())?;
        VolumeLoader.load_from_rows(&rows)
    }

    #[test]
    fn test_load_volume_entries() {
        let csv = "kode_analisa , URAIAN_PEKERJAAN,volume\n\
                   1.1.1,Pekerjaan Tanah,\"12,5\"\n\
                   ,,\n\
                   1.1.2,Urugan Pasir Bawah,2.5\n";
        let entries = load(csv).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].volume, 12.5);
        assert_eq!(entries[0].job_key(), "1.1.1 - Pekerjaan Tanah");
        assert_eq!(entries[1].volume, 2.5);
        assert_eq!(entries[1].row_number, 3);
    }

    #[test]
    fn test_malformed_volume_is_zero() {
        let entries = load("Kode_Analisa,Uraian_Pekerjaan,Volume\n1.1.1,Pekerjaan Tanah,abc\n").unwrap();
        assert_eq!(entries[0].volume, 0.0);
    }

    #[test]
    fn test_missing_column() {
        let result = load("Kode_Analisa,Uraian_Pekerjaan\n1.1.1,Pekerjaan Tanah\n");
        assert!(matches!(result, Err(ImportError::MissingColumn(c)) if c == "Volume"));
    }
}
