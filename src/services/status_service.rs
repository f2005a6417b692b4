use crate::error::{Error, Result};
use crate::models::evaluation::CandidateEvaluation;
use crate::services::huntflow_service::HuntflowService;
use tracing::info;

/// Pushes a verdict back to the ATS: stage name resolved to its id, then one
/// stage-update write carrying the commented justification.
#[derive(Clone)]
pub struct StatusService {
    huntflow: HuntflowService,
}

impl StatusService {
    pub fn new(huntflow: HuntflowService) -> Self {
        Self { huntflow }
    }

    pub async fn apply_verdict(
        &self,
        applicant_id: i64,
        vacancy_id: i64,
        evaluation: &CandidateEvaluation,
    ) -> Result<()> {
        let stage_name = evaluation.target_stage.as_str();
        let Some(stage_id) = self.huntflow.get_status_id_by_name(stage_name).await else {
            // An unresolved stage aborts the update; it is never sent as a
            // null id or coerced to a default stage.
            return Err(Error::NotFound(format!(
                "Vacancy stage '{}' not found",
                stage_name
            )));
        };

        let comment = format!("Оценка от ИИ: \n\n {}", evaluation.comment);
        self.huntflow
            .update_applicant_status(applicant_id, stage_id, vacancy_id, &comment)
            .await?;
        info!(
            "Applicant {} moved to stage '{}' on vacancy {}",
            applicant_id, stage_name, vacancy_id
        );
        Ok(())
    }
}
