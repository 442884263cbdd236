// ==========================================
// AHSP RAB 计算核心 - 分析表领域模型
// ==========================================
// 职责: Component / Job / JobMap / ParseStats
// 红线: 对外暴露的 Job 至少包含 1 个分项
// ==========================================

use crate::domain::types::ComponentCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// Component - 分析分项（人工/材料/机械一行）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,         // 分项名称
    pub code: Option<String>, // 资源代码（可缺失）
    pub unit: String,         // 单位
    pub coefficient: f64,     // 系数
    #[serde(default)]
    pub category: ComponentCategory, // 所属分段
}

// ==========================================
// Job - 一个工作项的单价分析
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,    // 分析编号（如 1.1.1）
    pub title: String, // 工作项名称
    pub components: Vec<Component>,
}

impl Job {
    /// 作业键: "{id} - {title}"
    pub fn key(&self) -> String {
        job_key(&self.id, &self.title)
    }
}

/// 拼接作业键（BoQ 文件也按同一规则回查）
pub fn job_key(id: &str, title: &str) -> String {
    format!("{} - {}", id.trim(), title.trim())
}

// ==========================================
// JobMap - 作业键 → Job
// ==========================================
// 同键后写覆盖（多文件时后解析者胜出），列表顺序按首次出现
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobMap {
    jobs: HashMap<String, Job>,
    order: Vec<String>,
}

impl JobMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入作业，返回被覆盖的旧作业（如有）
    pub fn insert(&mut self, job: Job) -> Option<Job> {
        let key = job.key();
        let previous = self.jobs.insert(key.clone(), job);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    /// 合并另一个文件的解析结果（后者覆盖）
    ///
    /// # 返回
    /// - 被覆盖的作业键数量
    pub fn merge(&mut self, other: JobMap) -> usize {
        let mut overwritten = 0;
        let JobMap { mut jobs, order } = other;
        for key in order {
            if let Some(job) = jobs.remove(&key) {
                if self.insert(job).is_some() {
                    overwritten += 1;
                }
            }
        }
        overwritten
    }

    pub fn get(&self, key: &str) -> Option<&Job> {
        self.jobs.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.jobs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    /// 按首次出现顺序迭代
    pub fn iter(&self) -> impl Iterator<Item = &Job> + '_ {
        self.order.iter().map(move |k| &self.jobs[k])
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

// ==========================================
// ParseStats - 单文件解析统计
// ==========================================
// 行级异常一律就地丢弃, 此处只计数便于排查
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines_total: usize,          // 读取行数
    pub job_headers: usize,          // 识别到的作业表头
    pub components: usize,           // 成功提取的分项
    pub dropped_rows: usize,         // 无法识别为分项而丢弃的行
    pub skipped_lines: usize,        // 空行 / 模板行（表头重复、分段标签、合计）
    pub discarded_empty_jobs: usize, // 无分项而丢弃的作业
}

impl ParseStats {
    /// 合并多个文件的统计
    pub fn absorb(&mut self, other: &ParseStats) {
        self.lines_total += other.lines_total;
        self.job_headers += other.job_headers;
        self.components += other.components;
        self.dropped_rows += other.dropped_rows;
        self.skipped_lines += other.skipped_lines;
        self.discarded_empty_jobs += other.discarded_empty_jobs;
    }
}

// ==========================================
// ParsedAnalysis - 单文件解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ParsedAnalysis {
    pub jobs: JobMap,
    pub stats: ParseStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, title: &str, coef: f64) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            components: vec![Component {
                name: "Pekerja".to_string(),
                code: None,
                unit: "OH".to_string(),
                coefficient: coef,
                category: ComponentCategory::Labor,
            }],
        }
    }

    #[test]
    fn test_job_key_format() {
        assert_eq!(
            job("1.1.1", "Pekerjaan Tanah", 1.0).key(),
            "1.1.1 - Pekerjaan Tanah"
        );
    }

    #[test]
    fn test_merge_last_file_wins() {
        let mut first = JobMap::new();
        first.insert(job("1.1", "Galian Tanah", 0.5));
        first.insert(job("1.2", "Urugan Pasir", 0.3));

        let mut second = JobMap::new();
        second.insert(job("1.1", "Galian Tanah", 0.75));

        let overwritten = first.merge(second);

        assert_eq!(overwritten, 1);
        assert_eq!(first.len(), 2);
        let merged = first.get("1.1 - Galian Tanah").unwrap();
        assert_eq!(merged.components[0].coefficient, 0.75);
        // 顺序保持首次出现
        let keys: Vec<&str> = first.keys().collect();
        assert_eq!(keys, vec!["1.1 - Galian Tanah", "1.2 - Urugan Pasir"]);
    }
}
