use std::fs;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;

use conch::{Config, InputMode, Session, Shell, render_lines};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to load into the buffer
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Content store root (overrides CONCH_CAS_ROOT)
    #[arg(long, value_name = "DIR")]
    cas_root: Option<PathBuf>,

    /// How input lines are interpreted
    #[arg(short, long, value_enum, default_value_t = InputMode::Sam)]
    mode: InputMode,

    /// Save the final buffer to the content store
    #[arg(short, long)]
    save: bool,

    /// Save and pin the final buffer
    #[arg(short, long)]
    pin: bool,

    /// Never highlight the dot
    #[arg(long)]
    no_color: bool,
}

/// Runs commands directly, without a shell, split on whitespace.
struct ProcessShell;

impl Shell for ProcessShell {
    fn run(&mut self, command: &str) -> Result<String> {
        let mut words = command.split_whitespace();
        let Some(program) = words.next() else {
            return Ok(String::new());
        };
        let output = Command::new(program)
            .args(words)
            .output()
            .with_context(|| format!("running {program}"))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut lines = Vec::new();
        if !stdout.trim().is_empty() {
            lines.push(stdout.trim().to_string());
        }
        if !stderr.trim().is_empty() {
            lines.push(format!("[stderr]\n{}", stderr.trim()));
        }
        match output.status.code() {
            Some(0) => {}
            Some(code) => lines.push(format!("[exit {code}]")),
            None => lines.push("[killed]".to_string()),
        }
        Ok(lines.join("\n"))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(root) = args.cas_root {
        config = config.with_cas_root(root);
    }
    let mut session = Session::new(config)
        .with_shell(ProcessShell)
        .with_mode(args.mode);

    if let Some(path) = args.file.as_ref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        session.load(&title, &contents);
    }

    for line in io::stdin().lock().lines() {
        session.submit(&line?)?;
        if let Some(status) = session.status() {
            eprintln!("{status}");
        }
        if !session.is_running() {
            break;
        }
    }

    let stdout = io::stdout();
    let styled = !args.no_color && stdout.is_terminal();
    render_lines(&mut stdout.lock(), session.lines(), session.dot(), styled)?;
    eprintln!("{} dot {}", session.caption(), session.dot());

    if args.save || args.pin {
        let hash = if args.pin {
            session.save_and_pin()?
        } else {
            session.save()?
        };
        println!("{hash}");
    }
    Ok(())
}
