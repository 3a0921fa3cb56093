use std::sync::Arc;
use std::time::Duration;

use simulado_core::engine::{AdvanceOutcome, DONT_KNOW_OPTION};
use simulado_core::model::{Question, QuestionHash, Simulado, SimuladoId};
use simulado_core::time::fixed_clock;
use services::{SessionLoopService, SessionStart};
use storage::repository::{
    IncorrectLogRepository, InMemoryRepository, ProgressRepository,
};

fn question(statement: &str, correct: &str) -> Question {
    Question::new(
        statement,
        vec!["A".into(), "B".into(), "C".into()],
        correct,
        format!("{statement} explained"),
        0,
    )
    .unwrap()
}

fn seed(repo: &InMemoryRepository) -> SimuladoId {
    let id = SimuladoId::new("rust-basics");
    let simulado = Simulado::new(
        id.clone(),
        "Rust Basics",
        vec![
            question("Q1", "B"),
            question("Q2", "A"),
            question("Q3", "C"),
        ],
    );
    repo.upsert_simulado(&simulado).unwrap();
    id
}

fn service(repo: &InMemoryRepository) -> SessionLoopService {
    SessionLoopService::new(
        fixed_clock(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    )
    .with_save_delay(Duration::from_millis(10))
}

#[tokio::test]
async fn quiz_runs_through_review_to_completion() {
    let repo = InMemoryRepository::new();
    let id = seed(&repo);
    let service = service(&repo);

    let SessionStart::Fresh(mut engine) = service.begin(&id).await.unwrap() else {
        panic!("expected a fresh session");
    };

    // First pass: Q1 right, Q2 wrong, Q3 skipped.
    engine.select_option("B");
    assert!(service.confirm_answer(&mut engine).unwrap().is_correct);
    assert_eq!(service.advance(&mut engine), Some(AdvanceOutcome::Next));

    engine.select_option("B");
    assert!(!service.confirm_answer(&mut engine).unwrap().is_correct);
    assert_eq!(service.advance(&mut engine), Some(AdvanceOutcome::Next));

    engine.select_option(DONT_KNOW_OPTION);
    assert!(service.confirm_answer(&mut engine).unwrap().skipped);
    assert_eq!(
        service.advance(&mut engine),
        Some(AdvanceOutcome::ReviewStarted { remaining: 2 })
    );

    // The debounced save lands while the review notice is on screen.
    tokio::time::sleep(Duration::from_millis(60)).await;
    let saved = repo.load_progress(&id).await.unwrap().unwrap();
    assert!(saved.is_review_mode);
    assert_eq!(saved.score, 1);
    assert_eq!(
        saved.review_questions,
        vec![QuestionHash::of("Q2"), QuestionHash::of("Q3")]
    );

    // Review pass: both cleared.
    engine.select_option("A");
    assert!(service.confirm_answer(&mut engine).unwrap().is_correct);
    assert_eq!(service.advance(&mut engine), Some(AdvanceOutcome::Next));

    engine.select_option("C");
    assert!(service.confirm_answer(&mut engine).unwrap().is_correct);
    let Some(AdvanceOutcome::Finished(summary)) = service.advance(&mut engine) else {
        panic!("expected completion");
    };

    assert_eq!(summary.score, 1);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.percentage, 33);

    // Completion clears the stored run and flushes the miss log to stats.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(repo.load_progress(&id).await.unwrap().is_none());
    let flushes = repo.stats_flushes().unwrap();
    assert_eq!(flushes.len(), 1);
    assert_eq!(
        flushes[0].0[&QuestionHash::of("Q2").value().to_string()].count,
        1
    );
}

#[tokio::test]
async fn explicit_save_resumes_in_a_later_session() {
    let repo = InMemoryRepository::new();
    let id = seed(&repo);
    let service = service(&repo);

    let SessionStart::Fresh(mut engine) = service.begin(&id).await.unwrap() else {
        panic!("expected a fresh session");
    };

    engine.select_option("B");
    service.confirm_answer(&mut engine).unwrap();
    service.advance(&mut engine).unwrap();
    service.save_progress_now(&engine).await.unwrap();

    // A new `begin` sees the save and waits for the user's decision.
    let SessionStart::Saved(pending) = service.begin(&id).await.unwrap() else {
        panic!("expected saved progress");
    };
    assert_eq!(pending.record().current_question_index, 1);

    let resumed = service.resume(pending).unwrap();
    assert_eq!(resumed.score(), 1);
    assert!(!resumed.is_review_mode());
    assert_eq!(resumed.current_question().unwrap().statement(), "Q2");
    assert_eq!(resumed.progress().total, 3);
}

#[tokio::test]
async fn misses_accumulate_in_the_log_across_sessions() {
    let repo = InMemoryRepository::new();
    let id = seed(&repo);
    let service = service(&repo);

    // Session one: miss Q1, then abandon.
    let SessionStart::Fresh(mut engine) = service.begin(&id).await.unwrap() else {
        panic!("expected a fresh session");
    };
    engine.select_option("C");
    service.confirm_answer(&mut engine).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Session two starts with the preloaded tally and misses Q1 again.
    let SessionStart::Fresh(mut engine) = service.begin(&id).await.unwrap() else {
        panic!("expected a fresh session");
    };
    engine.select_option("A");
    service.confirm_answer(&mut engine).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let log = repo.load_log().await.unwrap();
    assert_eq!(log.get(QuestionHash::of("Q1")).unwrap().count, 2);
}
