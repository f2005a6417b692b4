use serde::Deserialize;

/// Reference to one uploaded resume attached to an applicant. `updated` is
/// a unix timestamp; the newest reference wins when picking a resume.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRef {
    pub id: i64,
    #[serde(default)]
    pub updated: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Applicant {
    pub id: i64,
    #[serde(default)]
    pub external: Vec<ResumeRef>,
}
