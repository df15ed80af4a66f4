#![deny(warnings)]

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tagpatch_core::diff::{summarize, unified};
use tagpatch_core::{Config, Logger, OpenAiCollaborator, Proposal, Session};

#[derive(Parser)]
#[command(name = "tagpatch", about = "Edit a source file by delegating changes to a chat model")]
struct Cli {
    /// File to edit; asked for interactively when omitted.
    file: Option<PathBuf>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    temperature: Option<f32>,
    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,
    /// Emit JSON log lines on stderr.
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    config.verbose = cli.verbose;

    let logger = Logger::new(generate_rid()).verbose(config.verbose);
    let collaborator = OpenAiCollaborator::new(&config)?;

    let stdin = io::stdin();
    let mut input = stdin.lock();

    let path = match cli.file {
        Some(path) if path.is_file() => path,
        Some(path) => {
            println!("Not a file: {}", path.display());
            ask_path(&mut input)?
        }
        None => ask_path(&mut input)?,
    };
    let mut session = Session::open(&path, logger)?;

    loop {
        let prompt = "Please provide instructions or type 'quit' to exit: ";
        let Some(instruction) = ask(&mut input, prompt)? else {
            break;
        };
        if instruction.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        if instruction.trim().is_empty() {
            continue;
        }

        println!("\n--- Collaborator ---");
        let mut flush_error = None;
        let proposal = session.propose(&collaborator, &instruction, &mut |fragment: &str| {
            print!("{fragment}");
            if let Err(e) = io::stdout().flush() {
                flush_error.get_or_insert(e);
            }
        });
        if let Some(e) = flush_error {
            return Err(e).context("flush stdout");
        }
        println!("\n--------------------");

        let proposal = match proposal {
            Ok(proposal) => proposal,
            Err(e) => {
                println!("Round failed: {e}");
                continue;
            }
        };

        show_proposal(&session, &proposal);
        if !proposal.changes(session.document()) {
            println!("No changes proposed. Please provide new instructions.");
            session.reject(proposal);
            continue;
        }

        let answer = ask(&mut input, "Is this correct? (yes/no): ")?.unwrap_or_default();
        if answer.trim().eq_ignore_ascii_case("yes") {
            match session.accept(proposal) {
                Ok(()) => println!("Great! Updated {}.", session.document().path().display()),
                Err(e) => println!("Could not write the file: {e}"),
            }
        } else {
            session.reject(proposal);
            println!("Please provide new instructions.");
        }
    }

    let state = session.close();
    println!(
        "{} round(s): {} accepted, {} rejected, {} failed.",
        state.round_count, state.accepted, state.rejected, state.failed
    );
    Ok(())
}

/* ========================== Helpers ========================== */

fn show_proposal(session: &Session, proposal: &Proposal) {
    let document = session.document();
    let name = document
        .path()
        .file_name()
        .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());

    let summary = summarize(document.text(), &proposal.text);
    println!(
        "Blocks: {} tagged, {} edited, {} unknown directive(s) ignored.",
        proposal.tagged.blocks.len(),
        proposal.report.applied.len(),
        proposal.report.unresolved.len()
    );
    if summary.is_unchanged() {
        return;
    }
    println!(
        "Lines: +{} -{} ({:.1}% changed)\n",
        summary.inserted,
        summary.deleted,
        summary.percent_changed()
    );
    print!("{}", unified(document.text(), &proposal.text, &name));
}

fn ask(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("read stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn ask_path(input: &mut impl BufRead) -> Result<PathBuf> {
    loop {
        let Some(answer) = ask(input, "Please enter the path to the code file: ")? else {
            anyhow::bail!("no file given");
        };
        let path = PathBuf::from(answer.trim());
        if path.is_file() {
            return Ok(path);
        }
        println!("Invalid file path. Please try again.");
    }
}

fn generate_rid() -> u64 {
    ((Local::now().timestamp_millis() as u64) ^ u64::from(std::process::id())).max(1)
}
