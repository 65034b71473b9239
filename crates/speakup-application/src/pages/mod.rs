//! Page-level facades over collection views and repositories.

mod board;
mod scripts;
mod stories;
mod tools;

pub use board::ContentBoard;
pub use scripts::{SavedScripts, ScenarioDetail, ScriptGenerator};
pub use stories::StoryBoard;
pub use tools::ToolsOverview;

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
