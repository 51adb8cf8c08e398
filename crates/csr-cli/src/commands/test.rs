use clap::Subcommand;
use csr_core::{
    AptitudeSession, Config, CoreError, Event, HttpSentimentAnalyzer, PersonalitySession,
    QuestionDb, QuestionKind, ResponseState, ResultStore, SessionPhase,
};

use super::read_line;

#[derive(Subcommand)]
pub enum TestAction {
    /// Timed multiple-choice aptitude test
    Aptitude,
    /// Per-stream personality test (requires a completed aptitude test)
    Personality,
}

pub fn run(action: TestAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = QuestionDb::open()?;
    let mut store = ResultStore::open()?;
    let config = Config::load_or_default();

    match action {
        TestAction::Aptitude => run_aptitude(&db, &mut store, &config),
        TestAction::Personality => run_personality(&db, &mut store, &config),
    }
}

/// Print the completion message when `event` finishes a test.
fn report_finish(event: &Event) -> bool {
    if let Event::TestFinished {
        finished_by_timer,
        scores,
        ..
    } = event
    {
        if *finished_by_timer {
            println!("\nTime is up! The test was submitted automatically.");
        } else {
            println!("\nTest completed.");
        }
        for (name, score) in scores {
            println!("  {name}: {score}");
        }
        return true;
    }
    false
}

fn run_aptitude(
    db: &QuestionDb,
    store: &mut ResultStore,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = AptitudeSession::begin(db, config)?;

    println!("Aptitude test: {} questions, {} minutes.", session.total_questions(), config.aptitude.time_budget_min);
    println!("Commands: 1-4 select | c <0-100> confidence | n next | m mark | x clear | g <n> go to | q quit\n");

    loop {
        show_aptitude_question(&session);

        let Some(input) = read_line("> ") else {
            break;
        };
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        let finish_event = match command {
            "1" | "2" | "3" | "4" => {
                session.select_option(command.parse().unwrap_or(1));
                None
            }
            "c" => {
                match argument.and_then(|v| v.parse::<u8>().ok()).filter(|v| *v <= 100) {
                    Some(value) => session.set_confidence(value),
                    None => println!("confidence must be 0-100"),
                }
                None
            }
            "n" => session.advance(false, store)?,
            "m" => session.advance(true, store)?,
            "x" => {
                session.clear();
                None
            }
            "g" => {
                match argument.and_then(|v| v.parse::<usize>().ok()) {
                    Some(number) if (1..=session.total_questions()).contains(&number) => {
                        session.go_to_question(number - 1);
                    }
                    _ => println!("no such question"),
                }
                None
            }
            "q" => {
                session.request_quit();
                match read_line("Quit the test? All answers will be lost. [y/N] ").as_deref() {
                    Some("y") | Some("Y") => {
                        session.confirm_quit();
                    }
                    _ => {
                        session.cancel_quit();
                    }
                }
                None
            }
            "" => None,
            _ => {
                println!("unknown command (1-4, c, n, m, x, g, q)");
                None
            }
        };

        if let Some(event) = &finish_event {
            if report_finish(event) {
                return Ok(());
            }
        }

        // The countdown is flushed between commands; expiry finalizes the
        // test exactly as a manual finish would.
        if let Some(event) = session.tick(store)? {
            if report_finish(&event) {
                return Ok(());
            }
        }

        if session.phase() == SessionPhase::Abandoned {
            println!("Test abandoned; no scores were saved.");
            return Ok(());
        }
    }

    Ok(())
}

fn show_aptitude_question(session: &AptitudeSession) {
    let question = session.current_question();
    let response = session.response(session.current_index());
    let state = match response.state {
        ResponseState::Unanswered => "unanswered",
        ResponseState::Answered => "answered",
        ResponseState::Marked => "marked",
    };

    let remaining = session.remaining_secs();
    println!(
        "\n[{}/{}] ({}) {:02}:{:02} remaining -- {state}",
        session.current_index() + 1,
        session.total_questions(),
        question.category,
        remaining / 60,
        remaining % 60,
    );
    println!("{}", question.text);
    if let Some(image) = &question.reference_image {
        println!("(see reference image: {image})");
    }
    for (i, option) in question.options.iter().enumerate() {
        let marker = if session.pending_option() == Some(i as u8 + 1) {
            "*"
        } else {
            " "
        };
        println!("  {marker}{}. {option}", i + 1);
    }
    if session.pending_option().is_some() {
        println!("  confidence: {}%", session.pending_confidence());
    }
    println!("  [{} | {}]", session.next_label(), session.mark_label());
}

fn run_personality(
    db: &QuestionDb,
    store: &mut ResultStore,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = HttpSentimentAnalyzer::from_config(&config.sentiment)?;

    // The analyzer drives its HTTP calls through the current runtime handle.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut session = PersonalitySession::begin(db, store, config)?;
    println!(
        "Personality test: {} questions across all streams.\n",
        session.total_questions()
    );

    while !session.is_finished() {
        let (kind, stream, text) = {
            let question = session.current_question();
            (question.kind, question.stream.clone(), question.text.clone())
        };
        println!("\n{} ({stream})", session.question_number_display());
        println!("{text}");

        let event = match kind {
            QuestionKind::Slider => {
                match read_line(&format!("0-100, then {}: ", session.next_label())) {
                    Some(input) if input == "q" => {
                        if quit_confirmed(&mut session) {
                            println!("Test abandoned; no scores were saved.");
                            return Ok(());
                        }
                        continue;
                    }
                    Some(input) => match input.parse::<u8>().ok().filter(|v| *v <= 100) {
                        Some(value) => session.answer_slider(value, store)?,
                        None => {
                            println!("enter a value between 0 and 100, or q to quit");
                            continue;
                        }
                    },
                    None => break,
                }
            }
            QuestionKind::Textual => {
                let Some(answer) = read_line("your answer: ") else {
                    break;
                };
                if answer == "q" {
                    if quit_confirmed(&mut session) {
                        println!("Test abandoned; no scores were saved.");
                        return Ok(());
                    }
                    continue;
                }
                match session.answer_text(&analyzer, &answer, store) {
                    Ok(event) => event,
                    Err(CoreError::Analysis(analysis)) => {
                        println!("{analysis}");
                        match read_line("[r]etry or [s]kip this question? ").as_deref() {
                            Some("s") | Some("S") => session.skip(store)?,
                            _ => continue,
                        }
                    }
                    Err(other) => return Err(other.into()),
                }
            }
        };

        if let Some(event) = event {
            if report_finish(&event) {
                println!("You can now view your result with `csr result`.");
                return Ok(());
            }
        }
    }

    Ok(())
}

fn quit_confirmed(session: &mut PersonalitySession) -> bool {
    session.request_quit();
    match read_line("Quit the test? All answers will be lost. [y/N] ").as_deref() {
        Some("y") | Some("Y") => {
            session.confirm_quit();
            true
        }
        _ => {
            session.cancel_quit();
            false
        }
    }
}
