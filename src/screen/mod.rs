pub mod detail;
pub mod list;

pub use detail::{DetailScreen, DetailState};
pub use list::{ListScreen, ListState};
