//! CLI-only commands: config info, sign-in, history.
//!
//! These run without starting a quiz and produce plain text output.

use std::io::{self, Read};

use crate::core::api_key;
use crate::core::config::{self, Config};
use crate::core::history::{HistoryStore, StoredRecord};
use crate::core::identity::{Identity, User};
use crate::core::paths;
use crate::core::util;

/// Topic column width in history listings.
const TOPIC_WIDTH: usize = 20;

/// Run the `config` command: display paths, model, transport, and API key status.
pub fn run_config() {
    let config_dir = display_path(paths::config_dir());
    let cache_dir = display_path(paths::cache_dir());
    let data_dir = display_path(paths::data_dir());

    let config = match config::load_lenient() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let api_key_status = if config.api_key.is_some() {
        "set ✓"
    } else {
        "not set"
    };

    println!("Config:       {}", config_dir);
    println!("Cache:        {}", cache_dir);
    println!("Results:      {}", data_dir);
    println!("Model:        {}", config.model_id);
    println!("Transport:    {}", config.transport_label());
    println!("Timeout:      {}s", config.timeout.as_secs());
    println!("Min questions: {}", config.min_questions);
    println!("History kept: {}", config.history_limit);
    println!("API key:      {}", api_key_status);
}

fn display_path(path: Option<std::path::PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Run the `config set-api-key` command: store API key in config directory.
pub fn run_config_set_api_key(api_key: Option<String>) {
    let key = match api_key {
        Some(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
            buf.trim().to_string()
        }
    };

    match api_key::store_api_key(&key) {
        Ok(path) => println!("API key saved to {}", path.display()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn identity_or_exit() -> Identity {
    Identity::default_location().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Run the `login` command.
pub fn run_login(name: &str) {
    match identity_or_exit().sign_in(name) {
        Ok(user) => println!("Signed in as {}", user.display_name),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Run the `logout` command.
pub fn run_logout() {
    if let Err(e) = identity_or_exit().sign_out() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!("Signed out");
}

/// Run the `whoami` command.
pub fn run_whoami() {
    match identity_or_exit().current_user() {
        Some(user) => println!("{} ({})", user.display_name, user.id),
        None => println!("Not signed in"),
    }
}

fn signed_in_or_exit() -> User {
    identity_or_exit().current_user().unwrap_or_else(|| {
        eprintln!("Error: not signed in (run `quizmaster login <name>`)");
        std::process::exit(1);
    })
}

fn store_or_exit() -> HistoryStore {
    HistoryStore::default_location().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

/// Run the `history list` command: list the signed-in user's results, newest first.
pub fn run_history_list(limit: Option<usize>, query: Option<&str>) {
    let user = signed_in_or_exit();
    let records = match store_or_exit().list_records(&user.id) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filtered = util::filter_by_query(&records, query.unwrap_or(""), |r| {
        (r.record.topic.as_str(), r.record.difficulty.as_str())
    });
    if filtered.is_empty() {
        println!("No quiz results yet.");
        return;
    }

    let take = limit.unwrap_or(filtered.len());
    for r in filtered.into_iter().take(take) {
        println!("{}", format_record(r));
    }
}

/// Run the `history prune` command: keep only the newest `keep` results.
pub fn run_history_prune(config: &Config, keep: Option<usize>) {
    let user = signed_in_or_exit();
    let keep = keep.unwrap_or(config.history_limit);
    match store_or_exit().prune_to_most_recent(&user.id, keep) {
        Ok(survivors) => println!("{} result(s) kept", survivors.len()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// One history line: date, topic, difficulty, score.
fn format_record(r: &StoredRecord) -> String {
    let rec = &r.record;
    format!(
        "{}  {:<width$}  {:<12}  {}/{}",
        rec.timestamp.format("%Y-%m-%d %H:%M"),
        util::truncate_chars(&rec.topic, TOPIC_WIDTH),
        rec.difficulty,
        rec.score,
        rec.total_questions,
        width = TOPIC_WIDTH + 3
    )
}
