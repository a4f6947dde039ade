//! Talentflow: a recruitment-portal backend built around a multi-stage
//! hiring workflow engine.
//!
//! Employers author reusable workflow templates (ordered interview stages),
//! candidates apply to jobs, and the orchestration engine walks each
//! application through its stages until a hire/reject decision falls out.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
