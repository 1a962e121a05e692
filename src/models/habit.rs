use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::CompletionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(anyhow::anyhow!("Unknown frequency: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Fitness,
    Education,
    Wellness,
    Work,
    #[default]
    Personal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Fitness => "fitness",
            Category::Education => "education",
            Category::Wellness => "wellness",
            Category::Work => "work",
            Category::Personal => "personal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Fitness => "Fitness",
            Category::Education => "Education",
            Category::Wellness => "Wellness",
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(Category::Health),
            "fitness" => Ok(Category::Fitness),
            "education" => Ok(Category::Education),
            "wellness" => Ok(Category::Wellness),
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            _ => Err(anyhow::anyhow!("Unknown category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub frequency: Frequency,
    pub category: Category,
    pub goal: Option<String>,
    /// Time of day as `HH:MM`
    pub reminder: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A habit joined with its ledger and the streak computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitWithStats {
    #[serde(flatten)]
    pub habit: Habit,
    pub completions: Vec<CompletionRecord>,
    pub streak: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub category: Category,
    pub goal: Option<String>,
    pub reminder: Option<String>,
}

/// Partial update. `Some(None)` on the optional fields clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub frequency: Option<Frequency>,
    pub category: Option<Category>,
    pub goal: Option<Option<String>>,
    pub reminder: Option<Option<String>>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.frequency.is_none()
            && self.category.is_none()
            && self.goal.is_none()
            && self.reminder.is_none()
    }

    pub fn apply(&self, habit: &mut Habit) {
        if let Some(name) = &self.name {
            habit.name = name.trim().to_string();
        }
        if let Some(frequency) = self.frequency {
            habit.frequency = frequency;
        }
        if let Some(category) = self.category {
            habit.category = category;
        }
        if let Some(goal) = &self.goal {
            habit.goal = goal.clone();
        }
        if let Some(reminder) = &self.reminder {
            habit.reminder = reminder.clone();
        }
    }
}

/// Parse an `HH:MM` time-of-day.
pub fn parse_time_of_day(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|e| anyhow::anyhow!("Bad time '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Habit {
        Habit {
            id: 1,
            name: "Read".to_string(),
            frequency: Frequency::Daily,
            category: Category::Education,
            goal: Some("20 pages".to_string()),
            reminder: None,
            created_at: NaiveDateTime::parse_from_str("2024-03-01 08:00:00", "%Y-%m-%d %H:%M:%S")
                .unwrap(),
        }
    }

    #[test]
    fn category_and_frequency_parse_case_insensitively() {
        assert_eq!(Category::from_str("Health").unwrap(), Category::Health);
        assert_eq!(Category::from_str(" WORK ").unwrap(), Category::Work);
        assert_eq!(Frequency::from_str("Weekly").unwrap(), Frequency::Weekly);
        assert!(Category::from_str("hobby").is_err());
        assert!(Frequency::from_str("hourly").is_err());
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut habit = sample();
        let patch = HabitPatch {
            category: Some(Category::Wellness),
            goal: Some(None),
            ..Default::default()
        };
        patch.apply(&mut habit);
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.category, Category::Wellness);
        assert_eq!(habit.goal, None);
        assert!(!patch.is_empty());
        assert!(HabitPatch::default().is_empty());
    }

    #[test]
    fn joined_habit_serializes_flat_camel_case() {
        let joined = HabitWithStats {
            habit: sample(),
            completions: vec![],
            streak: 3,
        };
        let value = serde_json::to_value(&joined).unwrap();
        assert_eq!(value["name"], "Read");
        assert_eq!(value["category"], "education");
        assert_eq!(value["streak"], 3);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("habit").is_none());
    }

    #[test]
    fn time_of_day_requires_hh_mm() {
        assert!(parse_time_of_day("07:30").is_ok());
        assert!(parse_time_of_day("7pm").is_err());
        assert!(parse_time_of_day("25:00").is_err());
    }
}
