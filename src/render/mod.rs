pub mod context;
pub mod walker;

pub use context::build_context;
pub use walker::{execute_plan, plan_render, GeneratedProject, GenerationPlan, PlannedFile};
