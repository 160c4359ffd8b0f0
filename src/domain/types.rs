// ==========================================
// Apex OTB 采购计划系统 - 领域类型定义
// ==========================================
// 红线: 风险分类是 priority_score 的纯函数, 计算后不可变更
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险分类 (Risk Category)
// ==========================================
// 顺序: LowRisk < MediumRisk < HighRisk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    LowRisk,    // IMU% >= 60
    MediumRisk, // 55 <= IMU% < 60
    HighRisk,   // IMU% < 55
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskCategory::LowRisk => write!(f, "LOW_RISK"),
            RiskCategory::MediumRisk => write!(f, "MEDIUM_RISK"),
            RiskCategory::HighRisk => write!(f, "HIGH_RISK"),
        }
    }
}

impl RiskCategory {
    /// 从字符串解析风险分类
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW_RISK" => Some(RiskCategory::LowRisk),
            "MEDIUM_RISK" => Some(RiskCategory::MediumRisk),
            "HIGH_RISK" => Some(RiskCategory::HighRisk),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RiskCategory::LowRisk => "LOW_RISK",
            RiskCategory::MediumRisk => "MEDIUM_RISK",
            RiskCategory::HighRisk => "HIGH_RISK",
        }
    }
}

// ==========================================
// 采购建议 (Recommendation)
// ==========================================
// 由分配引擎逐条产出, 每次重算全量刷新, 不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Buy,           // 建议采购
    PassCapacity,  // 放弃: 超出预算容量
    PassRiskLimit, // 放弃: 超出高风险配额
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::PassCapacity => write!(f, "PASS_CAPACITY"),
            Recommendation::PassRiskLimit => write!(f, "PASS_RISK_LIMIT"),
        }
    }
}

impl Recommendation {
    /// 是否为采购建议
    pub fn is_buy(&self) -> bool {
        matches!(self, Recommendation::Buy)
    }
}

// ==========================================
// 财务月份 (Fiscal Month)
// ==========================================
// 固定 12 月排序: JAN..DEC = 0..11
// 用途: 时间桶排序键 = fiscal_year * 100 + month_index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FiscalMonth {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl FiscalMonth {
    /// 全部月份（按日历顺序）
    pub const ALL: [FiscalMonth; 12] = [
        FiscalMonth::Jan,
        FiscalMonth::Feb,
        FiscalMonth::Mar,
        FiscalMonth::Apr,
        FiscalMonth::May,
        FiscalMonth::Jun,
        FiscalMonth::Jul,
        FiscalMonth::Aug,
        FiscalMonth::Sep,
        FiscalMonth::Oct,
        FiscalMonth::Nov,
        FiscalMonth::Dec,
    ];

    /// 月份序号（JAN=0 .. DEC=11）
    pub fn month_index(&self) -> i32 {
        match self {
            FiscalMonth::Jan => 0,
            FiscalMonth::Feb => 1,
            FiscalMonth::Mar => 2,
            FiscalMonth::Apr => 3,
            FiscalMonth::May => 4,
            FiscalMonth::Jun => 5,
            FiscalMonth::Jul => 6,
            FiscalMonth::Aug => 7,
            FiscalMonth::Sep => 8,
            FiscalMonth::Oct => 9,
            FiscalMonth::Nov => 10,
            FiscalMonth::Dec => 11,
        }
    }

    /// 从字符串解析月份
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "JAN" => Some(FiscalMonth::Jan),
            "FEB" => Some(FiscalMonth::Feb),
            "MAR" => Some(FiscalMonth::Mar),
            "APR" => Some(FiscalMonth::Apr),
            "MAY" => Some(FiscalMonth::May),
            "JUN" => Some(FiscalMonth::Jun),
            "JUL" => Some(FiscalMonth::Jul),
            "AUG" => Some(FiscalMonth::Aug),
            "SEP" => Some(FiscalMonth::Sep),
            "OCT" => Some(FiscalMonth::Oct),
            "NOV" => Some(FiscalMonth::Nov),
            "DEC" => Some(FiscalMonth::Dec),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FiscalMonth::Jan => "JAN",
            FiscalMonth::Feb => "FEB",
            FiscalMonth::Mar => "MAR",
            FiscalMonth::Apr => "APR",
            FiscalMonth::May => "MAY",
            FiscalMonth::Jun => "JUN",
            FiscalMonth::Jul => "JUL",
            FiscalMonth::Aug => "AUG",
            FiscalMonth::Sep => "SEP",
            FiscalMonth::Oct => "OCT",
            FiscalMonth::Nov => "NOV",
            FiscalMonth::Dec => "DEC",
        }
    }
}

impl fmt::Display for FiscalMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 日历季度 (Fiscal Quarter)
// ==========================================
// 驾驶舱周期筛选的预设项 (Q1=JAN,FEB,MAR ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiscalQuarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl FiscalQuarter {
    /// 季度包含的三个月份
    pub fn months(&self) -> [FiscalMonth; 3] {
        match self {
            FiscalQuarter::Q1 => [FiscalMonth::Jan, FiscalMonth::Feb, FiscalMonth::Mar],
            FiscalQuarter::Q2 => [FiscalMonth::Apr, FiscalMonth::May, FiscalMonth::Jun],
            FiscalQuarter::Q3 => [FiscalMonth::Jul, FiscalMonth::Aug, FiscalMonth::Sep],
            FiscalQuarter::Q4 => [FiscalMonth::Oct, FiscalMonth::Nov, FiscalMonth::Dec],
        }
    }
}

impl fmt::Display for FiscalQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FiscalQuarter::Q1 => write!(f, "Q1"),
            FiscalQuarter::Q2 => write!(f, "Q2"),
            FiscalQuarter::Q3 => write!(f, "Q3"),
            FiscalQuarter::Q4 => write!(f, "Q4"),
        }
    }
}
