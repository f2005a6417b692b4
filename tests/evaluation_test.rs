mod common;

use common::{huntflow_for, spawn_stub, ScriptedLlm, StubAts};
use huntflow_screening::models::evaluation::{CandidateEvaluation, TargetStage};
use huntflow_screening::services::evaluation_service::EvaluationService;
use serde_json::json;
use std::sync::Arc;

fn evaluation_service(
    base_url: &str,
    llm: Arc<ScriptedLlm>,
) -> EvaluationService {
    EvaluationService::new(huntflow_for(base_url, "fresh"), llm, "Пермь".to_string())
}

fn seed_applicant_with_resume(stub: &StubAts, resume: serde_json::Value) {
    stub.applicants.lock().unwrap().insert(
        456,
        json!({
            "id": 456,
            "external": [
                { "id": 7, "updated": 1700000000 },
                { "id": 9, "updated": 1710000000 }
            ]
        }),
    );
    // id 9 is the most recently updated reference; only it may be fetched.
    stub.resumes
        .lock()
        .unwrap()
        .insert((456, 9), json!({ "resume": resume }));
}

#[tokio::test]
async fn missing_resume_short_circuits_to_reserve() {
    let stub = Arc::new(StubAts::with_token("fresh"));
    stub.applicants
        .lock()
        .unwrap()
        .insert(456, json!({ "id": 456, "external": [] }));
    let base_url = spawn_stub(stub.clone()).await;
    let llm = Arc::new(ScriptedLlm::default());

    let service = evaluation_service(&base_url, llm.clone());
    let verdict = service.evaluate_candidate(456, 123).await.unwrap();

    assert_eq!(verdict.target_stage, TargetStage::Reserve);
    assert_eq!(verdict.comment, "Резюме не найдено");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn unwilling_to_relocate_short_circuits_without_llm() {
    let stub = Arc::new(StubAts::with_token("fresh"));
    seed_applicant_with_resume(
        &stub,
        json!({
            "position": "Инженер",
            "area": { "city": { "name": "Москва" } },
            "relocation": { "type": { "name": "Не готов к переезду" } }
        }),
    );
    let base_url = spawn_stub(stub.clone()).await;
    let llm = Arc::new(ScriptedLlm::default());

    let service = evaluation_service(&base_url, llm.clone());
    let verdict = service.evaluate_candidate(456, 123).await.unwrap();

    assert_eq!(verdict.target_stage, TargetStage::Reserve);
    assert_eq!(verdict.comment, "Не готов к переезду в Пермь");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn unwilling_candidate_already_in_target_city_is_evaluated() {
    let stub = Arc::new(StubAts::with_token("fresh"));
    seed_applicant_with_resume(
        &stub,
        json!({
            "position": "Инженер",
            "area": { "city": "пермь" },
            "relocation": { "type": { "name": "не готов к переезду" } }
        }),
    );
    stub.vacancies
        .lock()
        .unwrap()
        .insert(123, json!({ "position": "Инженер", "body": "<p>Задачи</p>" }));
    let base_url = spawn_stub(stub.clone()).await;
    let llm = Arc::new(ScriptedLlm::replying(CandidateEvaluation {
        target_stage: TargetStage::Priority,
        comment: "Опыт соответствует".to_string(),
    }));

    let service = evaluation_service(&base_url, llm.clone());
    let verdict = service.evaluate_candidate(456, 123).await.unwrap();

    assert_eq!(verdict.target_stage, TargetStage::Priority);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn llm_receives_formatted_vacancy_and_resume() {
    let stub = Arc::new(StubAts::with_token("fresh"));
    seed_applicant_with_resume(
        &stub,
        json!({
            "position": "Разработчик Rust",
            "skill_set": ["Rust", "SQL"]
        }),
    );
    stub.vacancies.lock().unwrap().insert(
        123,
        json!({
            "position": "Разработчик",
            "money": "до 300 000",
            "body": "<p>Писать сервисы</p>"
        }),
    );
    let base_url = spawn_stub(stub.clone()).await;
    let llm = Arc::new(ScriptedLlm::replying(CandidateEvaluation {
        target_stage: TargetStage::New,
        comment: "Мало коммерческого опыта".to_string(),
    }));

    let service = evaluation_service(&base_url, llm.clone());
    let verdict = service.evaluate_candidate(456, 123).await.unwrap();

    assert_eq!(verdict.target_stage, TargetStage::New);
    let calls = llm.calls.lock().unwrap();
    let (system_prompt, user_prompt) = &calls[0];
    assert!(system_prompt.contains("приоритет"));
    assert!(user_prompt.contains("Вакансия: Разработчик"));
    assert!(user_prompt.contains("Писать сервисы"));
    assert!(user_prompt.contains("Позиция: Разработчик Rust"));
    assert!(user_prompt.contains("Rust, SQL"));
}

#[tokio::test]
async fn llm_failure_propagates() {
    let stub = Arc::new(StubAts::with_token("fresh"));
    seed_applicant_with_resume(&stub, json!({ "position": "Инженер" }));
    let base_url = spawn_stub(stub.clone()).await;
    // No canned verdict, so the scripted client fails the call.
    let llm = Arc::new(ScriptedLlm::default());

    let service = evaluation_service(&base_url, llm.clone());
    let result = service.evaluate_candidate(456, 123).await;

    assert!(result.is_err());
    assert_eq!(llm.call_count(), 1);
}
