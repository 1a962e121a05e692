pub mod completion;
pub mod habit;
pub mod settings;
pub mod stats;

pub use completion::{CompletionRecord, LedgerEntry, NewCompletion};
pub use habit::{Category, Frequency, Habit, HabitPatch, HabitWithStats, NewHabit};
pub use settings::{Settings, SettingsPatch, Theme};
pub use stats::{
    CategoryCompletion, ChartsReport, DailyProgress, ExportBundle, HabitStat, RatePoint,
    StatisticsReport, StatsSummary, StreakPoint,
};
