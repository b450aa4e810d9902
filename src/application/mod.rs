pub mod orchestrator;
pub mod stdio;
pub mod tooling;
