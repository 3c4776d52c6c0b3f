use bytes::Bytes;
use docuquiz::attempt::TimedAttempt;
use docuquiz::config::init_config;
use docuquiz::models::document::DocumentReference;
use docuquiz::models::quiz_config::QuizConfig;
use docuquiz::scheduler::TokioScheduler;
use docuquiz::session::QuizSession;
use docuquiz::AppState;
use std::env;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;

    let args: Vec<String> = env::args().collect();
    let path = args.get(1).ok_or_else(|| {
        anyhow::anyhow!("usage: docuquiz <document.pdf|.docx> [questions] [minutes]")
    })?;
    let number_of_questions: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);
    let duration_minutes: u32 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(15);

    let bytes = tokio::fs::read(path).await?;
    let name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path);
    let document = DocumentReference::from_bytes(name, Bytes::from(bytes))?;

    let state = AppState::new();
    let mut session = QuizSession::new();
    session.select_document(document)?;

    info!("Analyzing document for answers...");
    session.run_analysis(&state.analysis_service).await?;
    if let Some(err) = session.last_error() {
        anyhow::bail!("{}", err);
    }
    println!("\n=== Extracted answers ===");
    for (i, item) in session.qa_items().iter().enumerate() {
        println!("\nQ{}: {}\nA: {}", i + 1, item.question, item.answer);
    }

    session.request_quiz_setup()?;
    info!("Generating a {}-question quiz...", number_of_questions);
    session
        .run_generation(
            &state.analysis_service,
            QuizConfig {
                number_of_questions,
                duration_minutes,
            },
        )
        .await?;
    if let Some(err) = session.last_error() {
        anyhow::bail!("{}", err);
    }

    let scheduler = TokioScheduler;
    let questions = session.quiz_questions().to_vec();
    let mut timed = TimedAttempt::start(session.start_attempt()?, &scheduler);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "\n=== Quiz: {} question(s), {} minute(s) ===\nAnswer with A-D, empty line to skip.",
        questions.len(),
        duration_minutes
    );
    run_quiz(&mut timed, &questions, &mut lines).await?;
    timed.submit();

    if let Some(result) = timed.result() {
        println!(
            "\nScore: {}/{} ({}%)",
            result.score, result.total, result.percentage
        );
        for detail in &result.details {
            let mark = if detail.is_correct { "+" } else { "-" };
            let picked = detail
                .selected_option
                .map(|i| ((b'A' + i as u8) as char).to_string())
                .unwrap_or_else(|| "skipped".to_string());
            println!("  [{}] question {}: {}", mark, detail.question_id, picked);
        }

        println!("\nEmail the report to (blank to skip):");
        if let Ok(Some(address)) = lines.next_line().await {
            let address = address.trim();
            if !address.is_empty() {
                state.email_service.send_result(address, &result).await?;
                println!("Report sent to {}", address);
            }
        }
    }

    session.reset();
    Ok(())
}

async fn run_quiz(
    timed: &mut TimedAttempt,
    questions: &[docuquiz::models::question::QuizQuestion],
    lines: &mut Lines<BufReader<Stdin>>,
) -> anyhow::Result<()> {
    for q in questions {
        if timed.is_submitted() {
            println!("\nTime is up!");
            break;
        }
        println!(
            "\n[{}s left] {}. {}",
            timed.time_left_seconds(),
            q.id,
            q.question
        );
        for (idx, opt) in q.options.iter().enumerate() {
            println!("  {}. {}", (b'A' + idx as u8) as char, opt);
        }
        if let Some(line) = lines.next_line().await? {
            let trimmed = line.trim().to_uppercase();
            if let Some(first) = trimmed.bytes().next() {
                if (b'A'..=b'D').contains(&first) {
                    timed.select_option(q.id, (first - b'A') as usize);
                }
            }
        }
    }
    Ok(())
}
