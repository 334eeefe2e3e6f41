//! Course advisor wizard
//!
//! Upload -> Questions -> Requirements -> Recommendations, plus the GPA
//! calculator. All state lives in [`Controller`]; frontends only send
//! [`Action`]s and draw [`Snapshot`]s.

pub mod controller;
pub mod feedback;
pub mod gpa;
pub mod requirements;
pub mod state;

pub use controller::{Action, Controller, ControllerHandle, Edit, InputTarget, Snapshot, Tab};
pub use feedback::{LoadingGuard, LoadingIndicator, StatusKind, StatusLine, StatusMessage};
pub use gpa::{format_credits, format_gpa, GpaCalculator, GradeEntry};
pub use requirements::{parse_with_default, RequirementField, RequirementsForm};
pub use state::{format_score, option_label, Step, WizardState};
