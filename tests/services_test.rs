use docuquiz::attempt::QuizAttempt;
use docuquiz::error::Error;
use docuquiz::models::question::QuizQuestion;
use docuquiz::services::analysis::{parse_qa_items, parse_quiz_questions};
use docuquiz::services::email::EmailService;
use std::time::Duration;

#[test]
fn qa_payload_parses_strictly() {
    let raw = r#"[
        {"question": "What is an atom?", "answer": "The smallest unit of matter."},
        {"question": "What is a molecule?", "answer": "Two or more bonded atoms."}
    ]"#;
    let items = parse_qa_items(raw).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].question, "What is a molecule?");
}

#[test]
fn qa_payload_with_missing_field_is_rejected() {
    let raw = r#"[{"question": "Orphan question"}]"#;
    assert!(matches!(parse_qa_items(raw), Err(Error::Analysis(_))));
}

#[test]
fn qa_payload_that_is_not_json_is_rejected() {
    assert!(matches!(
        parse_qa_items("Sorry, I cannot help with that."),
        Err(Error::Analysis(_))
    ));
}

#[test]
fn quiz_payload_parses_camel_case_wire_shape() {
    let raw = r#"[{
        "id": 1,
        "question": "Which planet is largest?",
        "options": ["Mars", "Jupiter", "Venus", "Earth"],
        "correctAnswerIndex": 1
    }]"#;
    let questions = parse_quiz_questions(raw).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].correct_answer_index, 1);
    assert_eq!(questions[0].valid_answer_index(), Some(1));
}

#[test]
fn quiz_payload_with_out_of_range_index_is_kept_but_flagged() {
    let raw = r#"[{
        "id": 7,
        "question": "Broken question",
        "options": ["a", "b", "c", "d"],
        "correctAnswerIndex": 9
    }]"#;
    let questions = parse_quiz_questions(raw).unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].valid_answer_index(), None);
}

#[test]
fn quiz_payload_missing_options_is_rejected() {
    let raw = r#"[{"id": 1, "question": "No options", "correctAnswerIndex": 0}]"#;
    assert!(matches!(
        parse_quiz_questions(raw),
        Err(Error::Analysis(_))
    ));
}

fn sample_result() -> docuquiz::attempt::AttemptResult {
    let mut attempt = QuizAttempt::new(
        vec![QuizQuestion {
            id: 1,
            question: "Q?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: 0,
        }],
        1,
    );
    attempt.select_option(1, 0);
    attempt.submit();
    attempt.result().unwrap().clone()
}

#[test]
fn email_send_acknowledges_after_the_simulated_delay() {
    tokio_test::block_on(async {
        let service = EmailService::new(Duration::from_millis(1));
        let result = sample_result();
        service
            .send_result("teacher@example.com", &result)
            .await
            .unwrap();
    });
}

#[test]
fn email_send_rejects_a_malformed_address() {
    tokio_test::block_on(async {
        let service = EmailService::new(Duration::from_millis(1));
        let result = sample_result();
        let err = service.send_result("not-an-address", &result).await;
        assert!(matches!(err, Err(Error::BadRequest(_))));
    });
}
