use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, Frequency, HabitWithStats, Settings};

/// Dashboard quick stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub current_streak: u32,
    pub completion_rate: u32,
    pub total_habits: u32,
    pub best_streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCompletion {
    pub category: Category,
    pub completion_rate: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartsReport {
    pub category_completions: Vec<CategoryCompletion>,
    pub monthly_progress: Vec<DailyProgress>,
    pub overall_completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStat {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub frequency: Frequency,
    pub streak: u32,
    pub completion_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakPoint {
    pub date: NaiveDate,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub habits: Vec<HabitStat>,
    pub category_data: Vec<CategoryCompletion>,
    pub streak_history: Vec<StreakPoint>,
    pub completion_history: Vec<RatePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub habits: Vec<HabitWithStats>,
    pub settings: Settings,
}
