//! Question design: deterministic fallback generation, prefetched blocks,
//! counterfactual refinement, and the heuristic belief updates that follow
//! each answer.

mod block_cache;
mod convergence;
mod counterfactual;
mod orthogonal;
mod updater;

pub use block_cache::BlockCache;
pub use convergence::ConvergenceMonitor;
pub use counterfactual::{apply_counterfactual_answer, plan_counterfactual, CounterfactualPlan};
pub use orthogonal::OrthogonalDesign;
pub use updater::apply_main_choice;
