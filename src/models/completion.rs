use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: i64,
    pub habit_id: i64,
    /// Serialized as `yyyy-MM-dd`
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompletion {
    pub habit_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
}

/// One ledger row joined to its habit's category, the unit the reporter scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    pub habit_id: i64,
    pub category: Category,
    pub date: NaiveDate,
    pub completed: bool,
}
