pub mod job;
pub mod resume;
pub mod validation;

pub use job::JobPosting;
pub use resume::{OptimizedResume, ResumeSource};
pub use validation::{FilterResult, ValidationResult};
