// ==========================================
// AHSP RAB 计算核心 - 领域类型定义
// ==========================================
// 依据: 价格匹配级联 (代码 → 名称 → 部分名称)
// 依据: AHSP 分项结构 (A 人工 / B 材料 / C 机械)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 价格匹配方式 (Match Kind)
// ==========================================
// 红线: 级联顺序固定, 先命中者生效
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchKind {
    ExactCode,   // 代码精确匹配
    ExactName,   // 名称精确匹配（小写）
    PartialName, // 名称部分匹配（子串 + 长度差保护）
    Unmatched,   // 未匹配，单价按 0 计
}

impl MatchKind {
    /// 是否命中价格库
    pub fn is_matched(&self) -> bool {
        !matches!(self, MatchKind::Unmatched)
    }

    /// 面向用户的状态标签（导出 CSV 使用）
    pub fn status_label(&self) -> &'static str {
        match self {
            MatchKind::ExactCode => "OK (Kode)",
            MatchKind::ExactName => "OK (Nama)",
            MatchKind::PartialName => "Mirip",
            MatchKind::Unmatched => "Tidak Ditemukan",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchKind::ExactCode => write!(f, "EXACT_CODE"),
            MatchKind::ExactName => write!(f, "EXACT_NAME"),
            MatchKind::PartialName => write!(f, "PARTIAL_NAME"),
            MatchKind::Unmatched => write!(f, "UNMATCHED"),
        }
    }
}

// ==========================================
// 分项类别 (Component Category)
// ==========================================
// 对应 AHSP 表中的 TENAGA / BAHAN / PERALATAN 分段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    Labor,     // 人工 (Tenaga Kerja)
    Material,  // 材料 (Bahan)
    Equipment, // 机械 (Peralatan)
    Other,     // 未标注分段
}

impl ComponentCategory {
    pub const ALL: [ComponentCategory; 4] = [
        ComponentCategory::Labor,
        ComponentCategory::Material,
        ComponentCategory::Equipment,
        ComponentCategory::Other,
    ];

    /// 从分段标签推断类别（标签已转大写）
    ///
    /// "TENAGA KERJA" → Labor, "BAHAN" → Material, "PERALATAN"/"ALAT" → Equipment
    pub fn from_section_label(upper: &str) -> Option<Self> {
        if upper.contains("TENAGA") || upper.contains("UPAH") {
            Some(ComponentCategory::Labor)
        } else if upper.contains("BAHAN") || upper.contains("MATERIAL") {
            Some(ComponentCategory::Material)
        } else if upper.contains("ALAT") {
            // PERALATAN 同样包含 ALAT
            Some(ComponentCategory::Equipment)
        } else {
            None
        }
    }

    /// 印尼语标签（导出 CSV 使用）
    pub fn label(&self) -> &'static str {
        match self {
            ComponentCategory::Labor => "TENAGA",
            ComponentCategory::Material => "BAHAN",
            ComponentCategory::Equipment => "ALAT",
            ComponentCategory::Other => "LAINNYA",
        }
    }
}

impl Default for ComponentCategory {
    fn default() -> Self {
        ComponentCategory::Other
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
