//! Interactive REPL embedding the askbot agent.
//!
//! The core has no `exit` branch by design; this embedding caller intercepts
//! the exit intent before handing the line to the agent.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use askbot_core::agent::Agent;
use askbot_core::brain::{Intent, IntentClassifier};
use askbot_core::faq::JsonFileCorpus;

const DEFAULT_CORPUS_PATH: &str = "data/faqs.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let corpus_path =
        std::env::var("FAQ_PATH").unwrap_or_else(|_| DEFAULT_CORPUS_PATH.to_string());
    info!(path = %corpus_path, "using FAQ corpus");

    let agent = Agent::new(Box::new(JsonFileCorpus::new(&corpus_path)));
    let classifier = IntentClassifier::new();

    println!("askbot - type 'help' for examples, 'exit' to quit.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        stdout.write_all(b"> ")?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if !input.is_empty() && classifier.classify(input) == Intent::Exit {
            break;
        }
        println!("{}", agent.respond(input));
    }
    println!("Bye.");
    Ok(())
}
