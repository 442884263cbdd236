// ==========================================
// AHSP RAB 计算核心 - 印尼格式数字解析
// ==========================================
// 规则: '.' 为千位分隔符, ',' 为小数点 ("1.000.000,00")
// 红线: 解析失败返回 0, 不中断管道
// ==========================================

/// 解析印尼格式数字，失败返回 0
///
/// # 示例
/// ```
/// use ahsp_rab::importer::number_parser::parse_indo_number;
/// assert_eq!(parse_indo_number("1.234.567,89"), 1234567.89);
/// assert_eq!(parse_indo_number("abc"), 0.0);
/// ```
pub fn parse_indo_number(value: &str) -> f64 {
    try_parse_indo_number(value).unwrap_or(0.0)
}

/// 解析印尼格式数字（不做兜底）
///
/// # 返回
/// - Some(f64): 解析成功且为有限值
/// - None: 空串 / 非数字 / NaN / 无穷
pub fn try_parse_indo_number(value: &str) -> Option<f64> {
    let cleaned = strip_currency(value).replace('.', "").replace(',', ".");
    parse_finite(&cleaned)
}

/// 解析系数单元格
///
/// 系数是小数（"0,5" / "0.025"），不会出现千位分隔符：
/// ',' 视为小数点，'.' 保留为小数点。"1.1.1" 这类编号不是数字。
pub fn try_parse_coefficient(value: &str) -> Option<f64> {
    parse_finite(&value.trim().replace(',', "."))
}

/// 解析普通小数（工程量 / 简表价格），失败返回 0
///
/// 与 try_parse_coefficient 同一规则: "2.5" → 2.5, "10,5" → 10.5
pub fn parse_plain_number(value: &str) -> f64 {
    try_parse_coefficient(value).unwrap_or(0.0)
}

/// 去掉 "Rp" 前缀与空白
fn strip_currency(value: &str) -> String {
    let trimmed = value.trim();
    let without_rp = trimmed
        .strip_prefix("Rp.")
        .or_else(|| trimmed.strip_prefix("Rp"))
        .or_else(|| trimmed.strip_prefix("RP"))
        .unwrap_or(trimmed);
    without_rp.chars().filter(|c| !c.is_whitespace()).collect()
}

fn parse_finite(cleaned: &str) -> Option<f64> {
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_indo_number_basic() {
        assert_eq!(parse_indo_number("1.234.567,89"), 1234567.89);
        assert_eq!(parse_indo_number("100.000"), 100000.0);
        assert_eq!(parse_indo_number("0,5"), 0.5);
        assert_eq!(parse_indo_number("  250000  "), 250000.0);
    }

    #[test]
    fn test_parse_indo_number_fallback_zero() {
        assert_eq!(parse_indo_number(""), 0.0);
        assert_eq!(parse_indo_number("abc"), 0.0);
        assert_eq!(parse_indo_number("-"), 0.0);
        assert_eq!(parse_indo_number("NaN"), 0.0);
    }

    #[test]
    fn test_parse_indo_number_currency_prefix() {
        assert_eq!(parse_indo_number("Rp 1.500.000"), 1500000.0);
        assert_eq!(parse_indo_number("Rp. 12.500,50"), 12500.5);
    }

    #[test]
    fn test_try_parse_coefficient() {
        assert_eq!(try_parse_coefficient("0,5"), Some(0.5));
        assert_eq!(try_parse_coefficient("0.025"), Some(0.025));
        assert_eq!(try_parse_coefficient("1.1.1"), None);
        assert_eq!(try_parse_coefficient("OH"), None);
        assert_eq!(try_parse_coefficient(""), None);
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_plain_number("2.5"), 2.5);
        assert_eq!(parse_plain_number("10,5"), 10.5);
        assert_eq!(parse_plain_number("150000"), 150000.0);
        assert_eq!(parse_plain_number("abc"), 0.0);
    }
}
