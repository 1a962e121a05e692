pub mod categories;
pub mod habits;
pub mod header;
pub mod statusbar;
pub mod streak;
pub mod weekly;
