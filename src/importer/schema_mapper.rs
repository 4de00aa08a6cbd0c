// ==========================================
// GSTR-1 汇总工具 - 列名映射器实现
// ==========================================
// 职责: 异构原始表头 → 标准字段（别名表，大小写不敏感，去空白，首个命中即生效）
// 红线: 必填字段缺失即校验失败；可选字段缺失表示"功能不可用"而非 0
// 说明: 映射为"原地重命名"语义，行顺序不变，下游只按标准字段名取值
// ==========================================

use crate::domain::dataset::{RawDataset, RawRecord};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

// ==========================================
// 字段定义
// ==========================================

/// 字段要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Mandatory, // 缺失即校验失败
    Optional,  // 缺失表示该功能不可用
}

/// 标准字段及其可接受的原始列名（按优先级排列，小写）
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub requirement: Requirement,
}

impl FieldSpec {
    pub const fn mandatory(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            requirement: Requirement::Mandatory,
        }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            requirement: Requirement::Optional,
        }
    }

    /// 友好名称（第一个别名），用于错误消息
    pub fn friendly_name(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or(self.name)
    }
}

/// 某一来源的列名映射表
#[derive(Debug)]
pub struct SchemaMap {
    pub fields: &'static [FieldSpec],
}

impl SchemaMap {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 字段友好名称（未定义的字段返回字段名本身）
    pub fn friendly_name<'a>(&self, name: &'a str) -> &'a str {
        match self.field(name) {
            Some(spec) => spec.friendly_name(),
            None => name,
        }
    }
}

// ==========================================
// 校验错误
// ==========================================

/// 必填字段缺失（消息列出每个缺失字段的友好名称）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Missing required columns: {}", .missing.join(", "))]
pub struct SchemaValidationError {
    pub missing: Vec<String>,
}

// ==========================================
// ColumnPlan - 列重命名计划
// ==========================================
/// 标准字段 → 原始列下标
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPlan {
    columns: BTreeMap<&'static str, usize>,
}

impl ColumnPlan {
    pub fn column(&self, field: &str) -> Option<usize> {
        self.columns.get(field).copied()
    }

    pub fn has(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }
}

// ==========================================
// SchemaMapper - 列名映射器
// ==========================================
pub struct SchemaMapper;

impl SchemaMapper {
    /// 解析表头，生成列重命名计划并校验必填字段
    ///
    /// # 规则
    /// 1. 原始表头建立 小写+去空白 索引（重复表头取第一个）
    /// 2. 每个标准字段按别名声明顺序查找，首个命中即生效
    /// 3. 必填字段未命中 → SchemaValidationError（按声明顺序列出全部缺失项）
    pub fn resolve(
        &self,
        headers: &[String],
        schema: &SchemaMap,
    ) -> Result<ColumnPlan, SchemaValidationError> {
        let mut index: HashMap<String, usize> = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            index.entry(header.trim().to_lowercase()).or_insert(idx);
        }

        let mut plan = ColumnPlan::default();
        let mut missing = Vec::new();

        for spec in schema.fields {
            let hit = spec
                .aliases
                .iter()
                .find_map(|alias| index.get(&alias.trim().to_lowercase()).copied());

            match hit {
                Some(col) => {
                    plan.columns.insert(spec.name, col);
                }
                None if spec.requirement == Requirement::Mandatory => {
                    missing.push(spec.friendly_name().to_string());
                }
                None => {}
            }
        }

        if !missing.is_empty() {
            return Err(SchemaValidationError { missing });
        }

        Ok(plan)
    }

    /// 应用列重命名计划，得到按标准字段访问的数据集
    pub fn apply(
        &self,
        dataset: RawDataset,
        schema: &SchemaMap,
    ) -> Result<ResolvedDataset, SchemaValidationError> {
        let plan = self.resolve(dataset.headers(), schema)?;
        let (_, records) = dataset.into_parts();
        Ok(ResolvedDataset { plan, records })
    }
}

// ==========================================
// ResolvedDataset - 已映射数据集
// ==========================================
/// 列名解析后的数据集：只允许按标准字段名取值
#[derive(Debug, Clone)]
pub struct ResolvedDataset {
    plan: ColumnPlan,
    records: Vec<RawRecord>,
}

impl ResolvedDataset {
    pub fn has(&self, field: &str) -> bool {
        self.plan.has(field)
    }

    /// 任一字段可用
    pub fn has_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.plan.has(f))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = ResolvedRow<'_>> + '_ {
        self.records.iter().map(move |record| ResolvedRow {
            plan: &self.plan,
            record,
        })
    }
}

/// 已映射行视图
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRow<'a> {
    plan: &'a ColumnPlan,
    record: &'a RawRecord,
}

impl<'a> ResolvedRow<'a> {
    /// 取字段原始文本；字段未映射返回 None，单元格缺失视为空字符串
    pub fn text(&self, field: &str) -> Option<&'a str> {
        let col = self.plan.column(field)?;
        Some(self.record.get(col).unwrap_or(""))
    }

    pub fn row_number(&self) -> usize {
        self.record.row_number()
    }
}
