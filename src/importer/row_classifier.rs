// ==========================================
// AHSP RAB 计算核心 - 分析表行分类器
// ==========================================
// 职责: 两遍式行识别
//   第 1 遍: 每个字段打标签（空 / 系数范围内数字 / 短文本 / 长文本）
//   第 2 遍: 在标签序列上匹配已知行形态（作业表头 / 分项行）
// 红线: 只依赖相邻关系, 不依赖固定列号
// ==========================================

use crate::importer::number_parser::{try_parse_coefficient, try_parse_indo_number};

/// 作业编号最短长度
const JOB_ID_MIN_LEN: usize = 3;
/// 作业编号最大长度（不含）
const JOB_ID_MAX_LEN: usize = 20;
/// 作业标题最短长度（不含）
const JOB_TITLE_MIN_LEN: usize = 5;
/// 代码候选最大长度（不含）
const CODE_MAX_LEN: usize = 15;

// ==========================================
// FieldTag - 字段标签（第 1 遍）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldTag {
    Empty,
    Number(f64), // 落在系数区间 [0, max) 内的数字
    Short,       // 非数字短文本（单位候选，如 m3 / OH / bh）
    Text,        // 其他文本（含区间外数字）
}

// ==========================================
// ComponentShape - 分项行形态（第 2 遍结果）
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentShape {
    pub name: String,
    pub code: Option<String>,
    pub unit: String,
    pub coefficient: f64,
}

// ==========================================
// RowClassifier - 行分类器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct RowClassifier {
    max_coefficient: f64,
    max_unit_len: usize,
}

impl RowClassifier {
    pub fn new(max_coefficient: f64, max_unit_len: usize) -> Self {
        Self {
            max_coefficient,
            max_unit_len,
        }
    }

    /// 第 1 遍: 字段打标签
    pub fn classify(&self, fields: &[String]) -> Vec<FieldTag> {
        fields.iter().map(|f| self.tag(f)).collect()
    }

    fn tag(&self, field: &str) -> FieldTag {
        let field = field.trim();
        if field.is_empty() {
            return FieldTag::Empty;
        }
        match try_parse_coefficient(field) {
            Some(v) if v >= 0.0 && v < self.max_coefficient => FieldTag::Number(v),
            Some(_) => FieldTag::Text,
            // 单位必须非数字: 否则 "0.025,Rp 150.000" 这类 系数 + 价格 行
            // 会把系数当单位, 把价格当系数
            None if field.chars().count() <= self.max_unit_len => FieldTag::Short,
            None => FieldTag::Text,
        }
    }

    /// 定位系数列: 第一个区间内数字且左邻为单位候选
    ///
    /// # 返回
    /// - Some((系数列, 系数值))
    pub fn find_coefficient_column(&self, tags: &[FieldTag]) -> Option<(usize, f64)> {
        tags.iter().enumerate().skip(1).find_map(|(idx, tag)| match tag {
            FieldTag::Number(v) if tags[idx - 1] == FieldTag::Short => Some((idx, *v)),
            _ => None,
        })
    }

    /// 第 2 遍: 匹配分项行形态
    ///
    /// # 规则
    /// - 单位 = 系数列左邻
    /// - 单位左侧最近的非空字段为候选; 候选像代码时, 再往左最近的非空字段为名称
    /// - 代码分支找不到可用名称（空或纯编号）时, 仅当候选是纯字母单词
    ///   （如 "Mandor"）才作名称; "L.02" / "E01" 这类真代码整行丢弃
    ///
    /// # 返回
    /// - None: 不是分项行（静默丢弃）
    pub fn match_component(&self, fields: &[String]) -> Option<ComponentShape> {
        let tags = self.classify(fields);
        let (coef_col, coefficient) = self.find_coefficient_column(&tags)?;
        let unit_col = coef_col - 1;

        let candidate_col = nearest_non_empty_left(fields, unit_col)?;
        let candidate = fields[candidate_col].trim();

        let (name, code) = if looks_like_code(candidate) {
            match nearest_non_empty_left(fields, candidate_col)
                .map(|i| fields[i].trim())
                .filter(|n| !is_row_number(n))
            {
                Some(name) => (name.to_string(), Some(candidate.to_string())),
                None if is_plain_word(candidate) => (candidate.to_string(), None),
                None => return None,
            }
        } else {
            (candidate.to_string(), None)
        };

        if name.is_empty() || is_job_id(&name) {
            return None;
        }

        Some(ComponentShape {
            name,
            code,
            unit: fields[unit_col].trim().to_string(),
            coefficient,
        })
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::new(10_000.0, 8)
    }
}

/// 作业表头识别
///
/// 从左到右找第一个: 作业编号候选 且 右邻字段像标题
///
/// # 返回
/// - Some((编号, 标题))
pub fn detect_job_header(fields: &[String]) -> Option<(String, String)> {
    fields.windows(2).find_map(|pair| {
        let id = pair[0].trim();
        let title = pair[1].trim();
        if is_job_id(id) && looks_like_title(title) {
            Some((id.to_string(), title.to_string()))
        } else {
            None
        }
    })
}

/// 作业编号模式: 长度 [3, 20)、数字开头、含 '.'（如 1.1.1 / 2.2.3a）
pub fn is_job_id(value: &str) -> bool {
    let len = value.chars().count();
    (JOB_ID_MIN_LEN..JOB_ID_MAX_LEN).contains(&len)
        && value.chars().next().is_some_and(|c| c.is_ascii_digit())
        && value.contains('.')
}

/// 标题: 长度 > 5、含字母、且不是金额（"Rp 150.000"）
///
/// 只看长度会把 "0.025,Rp 150.000" 中的系数当编号、金额当标题
fn looks_like_title(value: &str) -> bool {
    value.chars().count() > JOB_TITLE_MIN_LEN
        && value.chars().any(char::is_alphabetic)
        && try_parse_indo_number(value).is_none()
}

/// 代码候选: 长度 < 15 且（含 '.' 或全字母数字）
fn looks_like_code(value: &str) -> bool {
    value.chars().count() < CODE_MAX_LEN
        && (value.contains('.') || value.chars().all(char::is_alphanumeric))
}

/// 纯字母单词（无 '.'、无数字），代码位上缺名称时可作名称
fn is_plain_word(value: &str) -> bool {
    !value.is_empty() && value.chars().all(char::is_alphabetic)
}

/// 纯编号（行号 "1" / "12" / "1.2"），不可作名称
fn is_row_number(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

fn nearest_non_empty_left(fields: &[String], before: usize) -> Option<usize> {
    (0..before).rev().find(|&i| !fields[i].trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_tags() {
        let classifier = RowClassifier::default();
        let tags = classifier.classify(&row(&["", "0,5", "OH", "Pekerja Terampil", "150.000"]));

        assert_eq!(
            tags,
            vec![
                FieldTag::Empty,
                FieldTag::Number(0.5),
                FieldTag::Short,
                FieldTag::Text,
                FieldTag::Number(150.0)
            ]
        );
    }

    #[test]
    fn test_number_out_of_range_is_text() {
        let classifier = RowClassifier::default();
        assert_eq!(classifier.classify(&row(&["150000"])), vec![FieldTag::Text]);
        assert_eq!(classifier.classify(&row(&["-1"])), vec![FieldTag::Text]);
    }

    #[test]
    fn test_component_with_code() {
        let shape = RowClassifier::default()
            .match_component(&row(&["1", "Pekerja", "L.01", "OH", "0,5", "100.000", "50.000"]))
            .unwrap();

        assert_eq!(shape.name, "Pekerja");
        assert_eq!(shape.code.as_deref(), Some("L.01"));
        assert_eq!(shape.unit, "OH");
        assert_eq!(shape.coefficient, 0.5);
    }

    #[test]
    fn test_component_without_code() {
        let shape = RowClassifier::default()
            .match_component(&row(&["", "Semen Portland", "kg", "0.025"]))
            .unwrap();

        assert_eq!(shape.name, "Semen Portland");
        assert_eq!(shape.code, None);
        assert_eq!(shape.unit, "kg");
        assert_eq!(shape.coefficient, 0.025);
    }

    #[test]
    fn test_single_word_name_after_row_number() {
        // "Mandor" 像代码, 但左侧只有行号 → 仍作为名称
        let shape = RowClassifier::default()
            .match_component(&row(&["2", "Mandor", "OH", "0,05"]))
            .unwrap();

        assert_eq!(shape.name, "Mandor");
        assert_eq!(shape.code, None);
    }

    #[test]
    fn test_code_without_name_dropped() {
        let classifier = RowClassifier::default();
        assert!(classifier
            .match_component(&row(&["", "L.02", "OH", "0.7"]))
            .is_none());
        assert!(classifier
            .match_component(&row(&["3", "E01", "jam", "0,2"]))
            .is_none());
    }

    #[test]
    fn test_no_unit_before_number() {
        let classifier = RowClassifier::default();
        assert!(classifier
            .match_component(&row(&["Pekerja Terampil Sekali", "", "0,5"]))
            .is_none());
        assert!(classifier.match_component(&row(&["", "", ""])).is_none());
    }

    #[test]
    fn test_unit_without_name_dropped() {
        assert!(RowClassifier::default()
            .match_component(&row(&["OH", "0,5"]))
            .is_none());
    }

    #[test]
    fn test_job_id_as_name_dropped() {
        assert!(RowClassifier::default()
            .match_component(&row(&["", "1.2.3", "m3", "1"]))
            .is_none());
    }

    #[test]
    fn test_numeric_field_is_not_unit() {
        // "0.025" 不能作单位, 否则 "Rp 150.000" 的数值会被当成系数
        let classifier = RowClassifier::default();
        assert!(classifier
            .match_component(&row(&["Semen Portland", "0.025", "150"]))
            .is_none());
    }

    #[test]
    fn test_detect_job_header() {
        assert_eq!(
            detect_job_header(&row(&["", "1.1.1", "Pekerjaan Tanah", ""])),
            Some(("1.1.1".to_string(), "Pekerjaan Tanah".to_string()))
        );
        // 标题过短
        assert_eq!(detect_job_header(&row(&["1.1.1", "Gali"])), None);
        // 价格列不是表头（右邻是数字）
        assert_eq!(detect_job_header(&row(&["OH", "100.000", "50.000"])), None);
        assert_eq!(
            detect_job_header(&row(&["Pekerja", "OH", "0.025", "Rp 150.000"])),
            None
        );
        // 字母开头不是作业编号
        assert_eq!(detect_job_header(&row(&["A.2.2.1", "Pembersihan lahan"])), None);
    }

    #[test]
    fn test_is_job_id() {
        assert!(is_job_id("1.1.1"));
        assert!(is_job_id("2.2.3a"));
        assert!(is_job_id("1.1"));
        assert!(!is_job_id("111"));
        assert!(!is_job_id("L.01"));
        assert!(!is_job_id("1.2.3.4.5.6.7.8.9.10"));
    }
}
