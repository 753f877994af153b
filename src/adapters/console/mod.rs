//! Console presentation: renders question tables and collects 1/2
//! answers from stdin.

mod collector;
mod render;
mod scripted;

pub use collector::ConsoleAnswerCollector;
pub use render::render_prompt;
pub use scripted::ScriptedAnswerCollector;
