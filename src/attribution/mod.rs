// Line-Level Time Attribution
//
// Only line *start* events are observable, so the time spent on line L is
// the gap between L's event and the next event in the same file. Each file
// carries at most one open interval, and across the whole session only the
// most recently active tracked file may keep one: switching files drops the
// previous file's interval instead of flushing it, so a gap spent elsewhere
// is never charged to a stale line.

mod engine;
mod hook;

pub use engine::{AttributionEngine, EngineStats};
pub use hook::LineHook;
