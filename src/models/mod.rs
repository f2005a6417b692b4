pub mod applicant;
pub mod evaluation;
pub mod resume;
pub mod stage;
pub mod vacancy;
