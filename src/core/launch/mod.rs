mod task;

pub use task::{run_foreground, LaunchPlan};
