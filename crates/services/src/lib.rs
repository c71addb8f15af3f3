//! Flow services for the learning portal: assessment sessions, the
//! remediation loop, the daily challenge, and history analytics, wired over
//! the content catalog and the blob-backed stores.

#![forbid(unsafe_code)]

pub mod analytics;
pub mod challenge;
pub mod error;
pub mod portal_services;
pub mod remediation;
pub mod sessions;

pub use analytics::{TREND_LIMIT, TopicMastery, TrendPoint, exam_score_trend, topic_mastery};
pub use challenge::{ChallengeOutcome, ChallengeStatus, DailyChallengeService};
pub use error::{ChallengeError, PortalInitError, RemediationError, SessionError};
pub use portal_services::PortalServices;
pub use remediation::{RemediationLoop, RemediationStep};
pub use sessions::{
    AssessmentService, AssessmentSession, PostSubmit, PracticeConfig, SessionMode, SessionPhase,
    SessionProgress, SubmissionOutcome, SubmissionTrigger,
};

pub use portal_core::Clock;
