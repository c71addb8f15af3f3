//! Assessment session lifecycle: selection, state machine, navigation guard,
//! and the submission workflow.

pub mod guard;
pub mod selection;
pub mod session;
pub mod workflow;

pub use guard::NavigationGuard;
pub use selection::PracticeConfig;
pub use session::{AssessmentSession, SessionMode, SessionPhase, SessionProgress};
pub use workflow::{
    AssessmentService, PostSubmit, REDIRECT_DELAY_MS, SubmissionOutcome, SubmissionTrigger,
};
