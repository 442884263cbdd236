// ==========================================
// AHSP RAB 计算核心 - 价格匹配引擎
// ==========================================
// 级联（首个命中即返回）:
//   1. 代码精确匹配
//   2. 名称精确匹配（小写）
//   3. 名称部分匹配（按价格库插入顺序, 长度差受限）
//   4. 未匹配（单价 0）
// 红线: 纯函数, 不修改价格索引; 未匹配不是错误
// ==========================================

use crate::domain::{Component, MatchKind, PriceIndex, PriceRecord, ResolvedLineItem};
use tracing::trace;

// ==========================================
// PriceResolver - 价格匹配引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct PriceResolver {
    max_len_diff: usize, // 部分匹配允许的字符长度差（不含）
}

impl PriceResolver {
    pub fn new(max_len_diff: usize) -> Self {
        Self { max_len_diff }
    }

    /// 为分项定价
    ///
    /// # 参数
    /// - component: 分析表中的分项
    /// - index: 价格双索引
    ///
    /// # 返回
    /// ResolvedLineItem（line_total = coefficient * unit_price）
    pub fn resolve(&self, component: &Component, index: &PriceIndex) -> ResolvedLineItem {
        let (match_kind, record) = self.lookup(component, index);
        let unit_price = record.map(|r| r.unit_price).unwrap_or(0.0);

        trace!(
            name = %component.name,
            match_kind = %match_kind,
            unit_price = unit_price,
            "分项定价完成"
        );

        ResolvedLineItem {
            component: component.clone(),
            unit_price,
            match_kind,
            matched_name: record.map(|r| r.name.clone()),
            line_total: component.coefficient * unit_price,
        }
    }

    /// 批量定价（保持分项顺序）
    pub fn resolve_all(&self, components: &[Component], index: &PriceIndex) -> Vec<ResolvedLineItem> {
        components.iter().map(|c| self.resolve(c, index)).collect()
    }

    fn lookup<'a>(
        &self,
        component: &Component,
        index: &'a PriceIndex,
    ) -> (MatchKind, Option<&'a PriceRecord>) {
        // === 1. 代码 ===
        if let Some(record) = component
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .and_then(|c| index.get_by_code(c))
        {
            return (MatchKind::ExactCode, Some(record));
        }

        let name = component.name.trim().to_lowercase();
        if name.is_empty() {
            return (MatchKind::Unmatched, None);
        }

        // === 2. 名称精确 ===
        if let Some(record) = index.get_by_name(&name) {
            return (MatchKind::ExactName, Some(record));
        }

        // === 3. 名称部分 ===
        let name_len = name.chars().count();
        let partial = index.name_entries().find(|(key, _)| {
            (key.contains(name.as_str()) || name.contains(key))
                && name_len.abs_diff(key.chars().count()) < self.max_len_diff
        });
        if let Some((_, record)) = partial {
            return (MatchKind::PartialName, Some(record));
        }

        (MatchKind::Unmatched, None)
    }
}

impl Default for PriceResolver {
    fn default() -> Self {
        Self::new(15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentCategory;

    fn record(code: Option<&str>, name: &str, price: f64) -> PriceRecord {
        PriceRecord {
            code: code.map(str::to_string),
            name: name.to_string(),
            unit: "OH".to_string(),
            unit_price: price,
        }
    }

    fn component(name: &str, code: Option<&str>, coefficient: f64) -> Component {
        Component {
            name: name.to_string(),
            code: code.map(str::to_string),
            unit: "OH".to_string(),
            coefficient,
            category: ComponentCategory::Other,
        }
    }

    fn index(records: Vec<PriceRecord>) -> PriceIndex {
        let mut index = PriceIndex::new();
        for r in records {
            index.insert(r);
        }
        index
    }

    #[test]
    fn test_exact_code_beats_exact_name() {
        let index = index(vec![
            record(Some("L.01"), "Pekerja", 100_000.0),
            record(Some("L.99"), "Pekerja Lain", 999.0),
        ]);
        let item = PriceResolver::default().resolve(&component("Pekerja Lain", Some("L.01"), 0.5), &index);

        assert_eq!(item.match_kind, MatchKind::ExactCode);
        assert_eq!(item.unit_price, 100_000.0);
        assert_eq!(item.line_total, 50_000.0);
    }

    #[test]
    fn test_exact_name_case_insensitive() {
        let index = index(vec![record(None, "Semen Portland", 1_500.0)]);
        let item = PriceResolver::default().resolve(&component("SEMEN PORTLAND", Some("X.99"), 2.0), &index);

        assert_eq!(item.match_kind, MatchKind::ExactName);
        assert_eq!(item.line_total, 3_000.0);
    }

    #[test]
    fn test_partial_match_length_guard() {
        let resolver = PriceResolver::default();

        let long = index(vec![record(None, "Pasir Urug Sirtu Campur Batu Split Halus", 1.0)]);
        let item = resolver.resolve(&component("Pasir", None, 1.0), &long);
        assert_eq!(item.match_kind, MatchKind::Unmatched);
        assert_eq!(item.unit_price, 0.0);

        let short = index(vec![record(None, "Pasir Urug", 250_000.0)]);
        let item = resolver.resolve(&component("Pasir", None, 1.0), &short);
        assert_eq!(item.match_kind, MatchKind::PartialName);
        assert_eq!(item.matched_name.as_deref(), Some("Pasir Urug"));
    }

    #[test]
    fn test_partial_match_first_in_insertion_order() {
        let index = index(vec![
            record(None, "Besi Beton Polos", 12_000.0),
            record(None, "Besi Beton Ulir", 13_000.0),
        ]);
        let item = PriceResolver::default().resolve(&component("Besi Beton", None, 1.0), &index);

        assert_eq!(item.match_kind, MatchKind::PartialName);
        assert_eq!(item.unit_price, 12_000.0);
    }

    #[test]
    fn test_empty_name_never_matches() {
        let index = index(vec![record(None, "Pekerja", 100_000.0)]);
        let item = PriceResolver::default().resolve(&component("  ", Some(""), 1.0), &index);
        assert_eq!(item.match_kind, MatchKind::Unmatched);
        assert_eq!(item.matched_name, None);
    }
}
