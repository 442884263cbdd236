// ==========================================
// AHSP RAB 计算核心 - 价格库领域模型
// ==========================================
// 职责: PriceRecord + 双索引（按代码 / 按小写名称）
// 红线: 加载后只读, 重新加载整体替换
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// PriceRecord - 单条价格记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub code: Option<String>, // 资源代码（如 L.01），可缺失
    pub name: String,         // 资源名称（原样，已 TRIM）
    pub unit: String,         // 单位（OH / m3 / kg ...）
    pub unit_price: f64,      // 单价（Rp）
}

// ==========================================
// PriceIndex - 价格库双索引
// ==========================================
// by_code: 代码 → 记录（重复代码后者覆盖）
// by_name: 小写名称 → 记录（重复名称后者覆盖，但保留首次插入位置）
// 名称索引按首次插入顺序迭代，部分匹配结果因此对同一文件确定
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceIndex {
    records: Vec<PriceRecord>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    name_order: Vec<String>,
}

impl PriceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入一条记录
    ///
    /// # 规则
    /// - 名称索引: 总是插入（键 = 小写 TRIM 名称）
    /// - 代码索引: 仅当代码非空且长度 > 1
    pub fn insert(&mut self, record: PriceRecord) {
        let name_key = record.name.trim().to_lowercase();
        let code_key = record
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| c.chars().count() > 1)
            .map(str::to_string);

        let idx = self.records.len();
        self.records.push(record);

        if self.by_name.insert(name_key.clone(), idx).is_none() {
            self.name_order.push(name_key);
        }
        if let Some(code) = code_key {
            self.by_code.insert(code, idx);
        }
    }

    /// 按代码查找
    pub fn get_by_code(&self, code: &str) -> Option<&PriceRecord> {
        self.by_code.get(code.trim()).map(|&i| &self.records[i])
    }

    /// 按名称查找（调用方无需预先转小写）
    pub fn get_by_name(&self, name: &str) -> Option<&PriceRecord> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.records[i])
    }

    /// 按插入顺序迭代名称索引 (小写键, 记录)
    pub fn name_entries(&self) -> impl Iterator<Item = (&str, &PriceRecord)> + '_ {
        self.name_order
            .iter()
            .map(move |key| (key.as_str(), &self.records[self.by_name[key]]))
    }

    /// 迭代代码索引中的代码（无序，诊断用）
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_code.keys().map(String::as_str)
    }

    /// 名称索引条目数
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// 代码索引条目数
    pub fn code_count(&self) -> usize {
        self.by_code.len()
    }

    /// 原始记录数（含被覆盖的重复行）
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: Option<&str>, name: &str, price: f64) -> PriceRecord {
        PriceRecord {
            code: code.map(str::to_string),
            name: name.to_string(),
            unit: "OH".to_string(),
            unit_price: price,
        }
    }

    #[test]
    fn test_insert_builds_both_indices() {
        let mut index = PriceIndex::new();
        index.insert(record(Some("L.01"), "Pekerja", 100_000.0));

        assert_eq!(index.get_by_code("L.01").unwrap().unit_price, 100_000.0);
        assert_eq!(index.get_by_name("PEKERJA").unwrap().unit_price, 100_000.0);
        assert_eq!(index.len(), 1);
        assert_eq!(index.code_count(), 1);
    }

    #[test]
    fn test_short_code_not_indexed() {
        let mut index = PriceIndex::new();
        index.insert(record(Some("A"), "Semen", 1_500.0));
        index.insert(record(Some(""), "Pasir", 250_000.0));

        assert_eq!(index.code_count(), 0);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicate_name_overwrites_but_keeps_position() {
        let mut index = PriceIndex::new();
        index.insert(record(None, "Pasir Urug", 100.0));
        index.insert(record(None, "Semen", 200.0));
        index.insert(record(None, "pasir urug", 300.0));

        let entries: Vec<(&str, f64)> = index
            .name_entries()
            .map(|(k, r)| (k, r.unit_price))
            .collect();
        assert_eq!(entries, vec![("pasir urug", 300.0), ("semen", 200.0)]);
        assert_eq!(index.record_count(), 3);
    }
}
