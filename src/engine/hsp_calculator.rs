// ==========================================
// AHSP RAB 计算核心 - HSP 计算引擎
// ==========================================
// base_cost     = Σ line_total
// overhead_cost = base_cost * overhead_rate
// HSP           = base_cost + overhead_cost
// project_total = HSP * volume
// 红线: 费率合法性在配置层校验, 这里不拒绝任何数值
// ==========================================

use crate::domain::{CategorySubtotal, ComponentCategory, CostSummary, ResolvedLineItem};

/// 单位作业成本（volume = 0, project_total = 0）
pub fn compute_job_cost(items: &[ResolvedLineItem], overhead_rate: f64) -> CostSummary {
    let base_cost: f64 = items.iter().map(|i| i.line_total).sum();
    let overhead_cost = base_cost * overhead_rate;

    CostSummary {
        base_cost,
        overhead_rate,
        overhead_cost,
        unit_price: base_cost + overhead_cost,
        volume: 0.0,
        project_total: 0.0,
    }
}

/// 项目成本 = 单价 * 工程量（非正工程量照常相乘）
pub fn compute_project_cost(unit_price: f64, volume: f64) -> f64 {
    unit_price * volume
}

/// 填入工程量与项目成本
pub fn with_volume(summary: CostSummary, volume: f64) -> CostSummary {
    CostSummary {
        volume,
        project_total: compute_project_cost(summary.unit_price, volume),
        ..summary
    }
}

/// 按类别汇总（A 人工 / B 材料 / C 机械 / 其他）
///
/// 只输出至少有一个分项的类别, 顺序固定为 ComponentCategory::ALL
pub fn category_subtotals(items: &[ResolvedLineItem]) -> Vec<CategorySubtotal> {
    ComponentCategory::ALL
        .iter()
        .filter(|category| items.iter().any(|i| i.component.category == **category))
        .map(|category| CategorySubtotal {
            category: *category,
            total: items
                .iter()
                .filter(|i| i.component.category == *category)
                .map(|i| i.line_total)
                .sum(),
        })
        .collect()
}
