//! Application run modes: logger init, interactive play, JSON generation, proxy server.

use std::io::{self, BufRead, Write};
use std::net::SocketAddr;

use crate::cli::Args;
use crate::core;
use crate::core::config::Config;
use crate::core::history::HistoryStore;
use crate::core::identity::{Identity, User};
use crate::core::llm::AnyTransport;
use crate::core::quiz::{Difficulty, GenerationRequest, GeneratorSettings, QuizGenerator};
use crate::play::{self, QuizOutcome, QuizSession};
use crate::server::{self, ProxyState};

/// Initialize env_logger. In interactive mode, writes to file to keep prompts clean.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_interactive() {
        let log_path = core::paths::cache_dir().map(|d| d.join(format!("{}.log", core::app::NAME)));
        if let Some(path) = log_path
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

fn generator(config: &Config) -> Result<QuizGenerator<AnyTransport>, Box<dyn std::error::Error>> {
    let transport = AnyTransport::from_config(config)?;
    Ok(QuizGenerator::new(
        transport,
        GeneratorSettings::from_config(config),
    ))
}

/// Generate one quiz and print it as pretty JSON on stdout.
pub async fn run_generate(
    config: &Config,
    topic: &str,
    difficulty: Difficulty,
) -> Result<(), Box<dyn std::error::Error>> {
    let quiz = generator(config)?.generate_questions(topic, difficulty).await?;
    println!("{}", serde_json::to_string_pretty(&quiz)?);
    Ok(())
}

/// Interactive loop: setup, generate, answer, summary, and again on request.
pub async fn run_play(
    config: &Config,
    topic: Option<String>,
    difficulty: Option<Difficulty>,
) -> Result<(), Box<dyn std::error::Error>> {
    let generator = generator(config)?;
    log::info!("Playing with model {}", generator.settings().model);
    let user = Identity::default_location()
        .ok()
        .and_then(|identity| identity.current_user());
    if let Some(u) = &user {
        println!("Signed in as {}", u.display_name);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let mut session = QuizSession::new();
    let mut topic = topic;
    let mut difficulty = difficulty;

    loop {
        let request = setup(&mut input, &mut output, topic.take(), difficulty.take())?;
        if let Err(e) = core::persistence::save_last_difficulty(request.difficulty()) {
            log::warn!("Could not remember difficulty: {}", e);
        }

        writeln!(
            output,
            "Generating a {} quiz about {}...",
            request.difficulty(),
            request.topic()
        )?;
        match generator.generate(&request).await {
            Ok(quiz) => {
                log::info!("Starting quiz with {} questions", quiz.len());
                session.start(request, quiz)?
            }
            Err(e) => {
                log::error!("Quiz generation failed ({}): {}", e.kind(), e);
                session.fail(&e);
            }
        }

        if let Some(message) = session.last_error() {
            writeln!(output, "{}", message)?;
            if play::confirm(&mut input, &mut output, "Try again?")? {
                session.reset();
                continue;
            }
            return Ok(());
        }

        play::run_quiz(&mut session, &mut input, &mut output)?;
        if let Some(outcome) = session.outcome() {
            play::render_summary(&mut output, outcome)?;
            if let Some(u) = &user {
                save_result(config, u, outcome);
            }
        }

        if !play::confirm(&mut input, &mut output, "Play again?")? {
            return Ok(());
        }
        session.reset();
    }
}

fn setup<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    topic: Option<String>,
    difficulty: Option<Difficulty>,
) -> io::Result<GenerationRequest> {
    let topic = match topic.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => play::prompt_topic(input, output)?,
    };
    let difficulty = match difficulty {
        Some(d) => d,
        None => {
            let last = core::persistence::load_last_difficulty().unwrap_or_default();
            play::prompt_difficulty(input, output, last)?
        }
    };
    GenerationRequest::new(&topic, difficulty).map_err(|e| io::Error::other(e.to_string()))
}

/// Save the finished quiz and keep only the newest `history_limit` results.
fn save_result(config: &Config, user: &User, outcome: &QuizOutcome) {
    let store = match HistoryStore::default_location() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("History unavailable: {}", e);
            return;
        }
    };
    match store.save_record(&user.id, outcome.to_record(chrono::Utc::now())) {
        Ok(id) => log::info!("Saved quiz result {}", id),
        Err(e) => {
            log::warn!("Could not save quiz result: {}", e);
            return;
        }
    }
    if let Err(e) = store.prune_to_most_recent(&user.id, config.history_limit) {
        log::warn!("Could not prune quiz history: {}", e);
    }
}

/// Run the proxy until Ctrl-C.
pub async fn run_serve(config: &Config, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let state = ProxyState::from_config(config)?;
    server::serve(state, SocketAddr::from(([0, 0, 0, 0], port))).await?;
    Ok(())
}
