use serde::{Deserialize, Serialize};

/// 单项得分上限
pub const MAX_SUBSCORE: u8 = 25;
/// 总百分比上限
pub const MAX_PERCENTAGE: u8 = 100;

/// 评分维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreCategory {
    /// 问题理解
    Comprehension,
    /// ISO 9001 应用
    Iso9001,
    /// 结构与组织
    Structure,
    /// 方案完整性
    Completeness,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 4] = [
        ScoreCategory::Comprehension,
        ScoreCategory::Iso9001,
        ScoreCategory::Structure,
        ScoreCategory::Completeness,
    ];

    /// Oracle 返回 JSON 中的字段名
    pub fn wire_key(self) -> &'static str {
        match self {
            ScoreCategory::Comprehension => "puntuacion_comprension",
            ScoreCategory::Iso9001 => "puntuacion_iso9001",
            ScoreCategory::Structure => "puntuacion_estructura",
            ScoreCategory::Completeness => "puntuacion_completitud",
        }
    }
}

/// 标准化后的评分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub percentage: u8,
    pub comprehension_score: u8,
    pub iso9001_score: u8,
    pub structure_score: u8,
    pub completeness_score: u8,
    pub strengths: Vec<String>,
    pub improvement_areas: Vec<String>,
    pub detail: String,
}

impl ScoreRecord {
    /// 获取某一维度的得分
    pub fn subscore(&self, category: ScoreCategory) -> u8 {
        match category {
            ScoreCategory::Comprehension => self.comprehension_score,
            ScoreCategory::Iso9001 => self.iso9001_score,
            ScoreCategory::Structure => self.structure_score,
            ScoreCategory::Completeness => self.completeness_score,
        }
    }

    /// 四个维度得分之和
    pub fn subscore_sum(&self) -> u32 {
        ScoreCategory::ALL
            .iter()
            .map(|c| u32::from(self.subscore(*c)))
            .sum()
    }
}

/// 比较结果
///
/// `Parsed` 表示 Oracle 返回了合法的 JSON；`Degraded` 表示走了
/// 文本提取的兜底路径，可信度较低。两者都包含结构完整的记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreOutcome {
    Parsed(ScoreRecord),
    Degraded(ScoreRecord),
}

impl ScoreOutcome {
    pub fn record(&self) -> &ScoreRecord {
        match self {
            ScoreOutcome::Parsed(record) | ScoreOutcome::Degraded(record) => record,
        }
    }

    pub fn into_record(self) -> ScoreRecord {
        match self {
            ScoreOutcome::Parsed(record) | ScoreOutcome::Degraded(record) => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScoreOutcome::Degraded(_))
    }
}

/// 分数等级（用于展示着色）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// >= 80%
    Good,
    /// >= 60%
    Fair,
    Poor,
}

impl ScoreBand {
    /// 按得分占满分的比例划分等级
    pub fn classify(score: u32, max: u32) -> Self {
        if max == 0 {
            return ScoreBand::Poor;
        }
        // 整数比较，避免浮点误差；放宽到 u64 防止溢出
        let scaled = u64::from(score) * 100;
        let max = u64::from(max);
        if scaled >= max * 80 {
            ScoreBand::Good
        } else if scaled >= max * 60 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ScoreBand::Good => "🟢",
            ScoreBand::Fair => "🟡",
            ScoreBand::Poor => "🔴",
        }
    }
}
