use crate::error::Result;
use crate::models::evaluation::{CandidateEvaluation, TargetStage};
use crate::models::resume::Resume;
use crate::services::huntflow_service::HuntflowService;
use crate::services::llm_service::LlmClient;
use crate::utils::formatting::{format_resume, format_vacancy};
use std::sync::Arc;
use tracing::{debug, info};

/// Relocation-type phrasings that disqualify a candidate who lives outside
/// the target city before any LLM call is spent.
const UNWILLING_PHRASES: [&str; 3] = [
    "не готов к переезду",
    "не готова к переезду",
    "не могу переехать",
];

const SYSTEM_PROMPT: &str = "Ты — опытный рекрутер. Оцени резюме кандидата относительно требований вакансии.\n\
\n\
Правила оценки:\n\
1. Если опыт и навыки кандидата соответствуют требованиям вакансии полностью или с незначительными пробелами — target_stage: \"приоритет\".\n\
2. Если у кандидата недостаточно релевантного коммерческого опыта или есть существенные пробелы в навыках — target_stage: \"новые\".\n\
3. В comment кратко обоснуй оценку, опираясь ТОЛЬКО на текст резюме и вакансии. Не выдумывай факты, которых нет в тексте.\n\
\n\
Ответ верни строго в формате JSON: {\"target_stage\": \"приоритет\" | \"новые\", \"comment\": \"краткое обоснование\"}";

/// Orchestrates one evaluation: latest resume, relocation pre-filter, then a
/// single structured LLM call.
#[derive(Clone)]
pub struct EvaluationService {
    huntflow: HuntflowService,
    llm: Arc<dyn LlmClient>,
    target_city: String,
}

impl EvaluationService {
    pub fn new(huntflow: HuntflowService, llm: Arc<dyn LlmClient>, target_city: String) -> Self {
        Self {
            huntflow,
            llm,
            target_city,
        }
    }

    pub async fn evaluate_candidate(
        &self,
        applicant_id: i64,
        vacancy_id: i64,
    ) -> Result<CandidateEvaluation> {
        let Some(resume) = self.get_latest_resume(applicant_id).await? else {
            info!("No resume on file for applicant {}", applicant_id);
            return Ok(CandidateEvaluation {
                target_stage: TargetStage::Reserve,
                comment: "Резюме не найдено".to_string(),
            });
        };

        if self.is_not_ready_to_relocate(&resume) {
            info!(
                "Applicant {} is not willing to relocate, skipping LLM call",
                applicant_id
            );
            return Ok(CandidateEvaluation {
                target_stage: TargetStage::Reserve,
                comment: format!("Не готов к переезду в {}", self.target_city),
            });
        }

        let vacancy = self
            .huntflow
            .get_vacancy_description(vacancy_id)
            .await
            .unwrap_or_default();
        let resume_text = format_resume(Some(&resume));
        let vacancy_text = format_vacancy(&vacancy);
        let user_prompt = format!(
            "Вакансия:\n{}\n\nРезюме кандидата:\n{}",
            vacancy_text, resume_text
        );

        info!("Sending evaluation request to LLM for applicant {}", applicant_id);
        let answer = self.llm.evaluate(SYSTEM_PROMPT, &user_prompt).await?;
        info!("LLM verdict received for applicant {}", applicant_id);
        debug!(
            "LLM verdict: target_stage: {}, comment: {}",
            answer.target_stage, answer.comment
        );

        Ok(answer)
    }

    /// Fetches the applicant and unwraps the most recently updated resume
    /// reference. No references means no resume.
    async fn get_latest_resume(&self, applicant_id: i64) -> Result<Option<Resume>> {
        let applicant = self.huntflow.get_applicant(applicant_id).await?;
        let mut externals = applicant.external;
        debug!(
            "Found {} resume(s) for applicant {}",
            externals.len(),
            applicant_id
        );
        if externals.is_empty() {
            return Ok(None);
        }
        externals.sort_by(|a, b| b.updated.cmp(&a.updated));
        let latest = &externals[0];

        let document = self.huntflow.get_resume(applicant_id, latest.id).await;
        Ok(document.and_then(|d| d.resume))
    }

    /// True when the relocation type says the candidate will not move and
    /// the candidate is not already in the target city.
    fn is_not_ready_to_relocate(&self, resume: &Resume) -> bool {
        let relocation_type = resume
            .relocation
            .as_ref()
            .and_then(|r| r.kind.as_ref())
            .map(|k| k.as_str().to_lowercase())
            .unwrap_or_default();
        let unwilling = UNWILLING_PHRASES
            .iter()
            .any(|phrase| relocation_type.contains(phrase));
        if !unwilling {
            return false;
        }

        let current_city = resume
            .area
            .as_ref()
            .and_then(|a| a.city.as_ref())
            .map(|c| c.as_str().to_lowercase())
            .unwrap_or_default();
        current_city != self.target_city.to_lowercase()
    }
}
