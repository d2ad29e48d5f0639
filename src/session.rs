//! The interactive session: buffer, dot and input routing.
//!
//! A `Session` owns the only mutable editing state. Each submitted input
//! line is routed to a slash command, the shell, the chat model, the Sam
//! interpreter, or appended to the buffer as text. Commands run one at a
//! time; the interpreter and store are called synchronously.

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dot::Dot;
use crate::edit_mode::InputMode;
use crate::interpreter::{apply, split_lines};
use crate::parser::is_command;
use crate::store::ContentStore;

pub const DEFAULT_TITLE: &str = "Conch";

pub const HELP_TEXT: &str = "\
Available Commands:
  /help           - Show this help message
  /q, /quit       - End the session
  /clear, /cls    - Clear the buffer
  /w, /save       - Save the buffer to the content store
  /pin            - Save the buffer and pin it
  /use <model>    - Select the chat model
  /mode <m>       - Switch input mode (sh, sam, ai)

Shell Commands:
  sh: <command>   - Run a shell command (also \"> sh: <command>\")

Chat:
  :ai <prompt>    - Ask the chat model (or switch to ai mode)

Edit Commands (sam mode):
  2a/text/        - Append after line 2      2iText   - Insert before line 2
  2c/text/        - Change line 2            2d       - Delete line 2
  2m4, 1t4        - Move / copy a line       2q       - Keep lines 1-2
  2s/old/new/     - Substitute on line 2     . $.     - Move the dot
  \\text           - Add text literally";

/// Runs shell commands on behalf of the session.
pub trait Shell {
    fn run(&mut self, command: &str) -> Result<String>;
}

/// Produces chat replies on behalf of the session.
pub trait ChatModel {
    fn complete(&mut self, model: &str, prompt: &str) -> Result<String>;
}

pub struct Session {
    lines: Vec<String>,
    dot: Dot,
    mode: InputMode,
    title: String,
    status: Option<String>,
    model: String,
    config: Config,
    store: Option<ContentStore>,
    shell: Option<Box<dyn Shell>>,
    chat: Option<Box<dyn ChatModel>>,
    running: bool,
}

// Constructors
impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            lines: Vec::new(),
            dot: Dot::zero(),
            mode: InputMode::default(),
            title: DEFAULT_TITLE.to_string(),
            status: None,
            model: config.model.clone(),
            config,
            store: None,
            shell: None,
            chat: None,
            running: true,
        }
    }

    pub fn with_shell(mut self, shell: impl Shell + 'static) -> Self {
        self.shell = Some(Box::new(shell));
        self
    }

    pub fn with_chat(mut self, chat: impl ChatModel + 'static) -> Self {
        self.chat = Some(Box::new(chat));
        self
    }

    pub fn with_mode(mut self, mode: InputMode) -> Self {
        self.mode = mode;
        self
    }
}

// Accessors
impl Session {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn dot(&self) -> Dot {
        self.dot
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Buffer contents as one blob, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.iter().join("\n")
    }

    /// Title with the dot position, e.g. `notes.txt (2/10)`.
    pub fn caption(&self) -> String {
        format!(
            "{} ({}/{})",
            self.title,
            (self.dot.start + 1).min(self.lines.len()),
            self.lines.len()
        )
    }
}

// Input routing
impl Session {
    /// Handle one line of user input.
    ///
    /// Edit errors are reported through [`Session::status`] and leave the
    /// buffer untouched; store and I/O failures are returned.
    pub fn submit(&mut self, input: &str) -> Result<()> {
        let input = input.trim_end();
        if input.is_empty() {
            return Ok(());
        }
        self.status = None;

        if let Some(text) = input.strip_prefix('\\') {
            self.append(text);
            return Ok(());
        }
        if let Some(cmd) = input.strip_prefix('/') {
            return self.slash_command(cmd);
        }
        if let Some(cmd) = shell_command(input) {
            self.run_shell(cmd);
            return Ok(());
        }
        if let Some(prompt) = input.strip_prefix(":ai ") {
            self.run_chat(prompt.trim());
            return Ok(());
        }
        match self.mode {
            InputMode::Ai => self.run_chat(input),
            InputMode::Sam if is_command(input) => self.edit(input),
            InputMode::Sam | InputMode::Shell => self.append(input),
        }
        Ok(())
    }

    /// Run a Sam command against the buffer.
    pub fn edit(&mut self, command: &str) {
        match apply(command, &self.lines, self.dot) {
            Ok((lines, dot)) => {
                self.lines = lines;
                self.dot = dot;
            }
            Err(err) => {
                warn!(command, %err, "edit command failed");
                self.status = Some(format!("Error: {err}"));
            }
        }
    }

    fn slash_command(&mut self, cmd: &str) -> Result<()> {
        let (name, arg) = match cmd.trim().split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (cmd.trim(), ""),
        };
        match name.to_ascii_lowercase().as_str() {
            "q" | "quit" => self.running = false,
            "clear" | "cls" => self.clear(),
            "help" => {
                for line in HELP_TEXT.lines() {
                    self.append(line);
                }
            }
            "w" | "save" => {
                let hash = self.save()?;
                self.status = Some(format!("Saved: {hash}"));
            }
            "pin" => {
                let hash = self.save_and_pin()?;
                self.status = Some(format!("Pinned: {hash}"));
            }
            "use" => {
                if arg.is_empty() {
                    self.status = Some("Usage: /use <model>".to_string());
                } else {
                    self.model = arg.to_string();
                    self.append(&format!("[model] {}", self.model));
                }
            }
            "mode" => match arg.parse::<InputMode>() {
                Ok(mode) => {
                    self.mode = mode;
                    self.status = Some(format!("Mode: {mode}"));
                }
                Err(err) => self.status = Some(err.to_string()),
            },
            _ => self.status = Some(format!("Unknown command: /{name}")),
        }
        Ok(())
    }

    fn run_shell(&mut self, command: &str) {
        let Some(shell) = self.shell.as_mut() else {
            self.append("[error] no shell available");
            return;
        };
        self.lines.push(format!("> sh: {command}"));
        match shell.run(command) {
            Ok(output) => {
                let output = output.trim();
                if output.is_empty() {
                    self.lines.push("  (no output)".to_string());
                } else {
                    self.lines.extend(output.lines().map(|l| format!("  {l}")));
                }
            }
            Err(err) => self.lines.push(format!("[error] {err:#}")),
        }
        self.dot = Dot::line(self.lines.len() - 1);
    }

    fn run_chat(&mut self, prompt: &str) {
        self.lines.push(format!(":ai {prompt}"));
        let reply = match self.chat.as_mut() {
            Some(chat) => chat.complete(&self.model, prompt),
            None => Err(anyhow::anyhow!("no chat model configured")),
        };
        match reply {
            Ok(reply) => self.lines.extend(split_lines(&reply)),
            Err(err) => self.lines.push(format!("[ai error] {err:#}")),
        }
        self.dot = Dot::line(self.lines.len() - 1);
    }
}

// Buffer and dot actions
impl Session {
    /// Append a line and select it.
    pub fn append(&mut self, text: &str) {
        self.lines.push(text.to_string());
        self.dot = Dot::line(self.lines.len() - 1);
    }

    /// Replace the buffer with `text`, e.g. a file just read.
    pub fn load(&mut self, title: &str, text: &str) {
        self.lines = split_lines(text);
        self.title = title.to_string();
        self.dot = Dot::zero();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.dot = Dot::zero();
        self.title = DEFAULT_TITLE.to_string();
    }

    pub fn move_up(&mut self) {
        if !self.lines.is_empty() {
            self.dot = Dot::line(self.dot.start.saturating_sub(1));
        }
    }

    pub fn move_down(&mut self) {
        if !self.lines.is_empty() {
            self.dot = Dot::line((self.dot.start + 1).min(self.lines.len() - 1));
        }
    }

    pub fn move_top(&mut self) {
        if !self.lines.is_empty() {
            self.dot = Dot::line(0);
        }
    }

    pub fn move_bottom(&mut self) {
        if !self.lines.is_empty() {
            self.dot = Dot::line(self.lines.len() - 1);
        }
    }

    /// Delete the lines under the dot, `start..end`. A point dot deletes the
    /// line it marks, so this removes exactly what [`highlighted`] shows.
    ///
    /// [`highlighted`]: crate::render::highlighted
    pub fn delete_selection(&mut self) {
        let len = self.lines.len();
        if len == 0 {
            return;
        }
        let start = self.dot.start.min(len - 1);
        let end = self.dot.end.max(start + 1).min(len);
        self.lines.drain(start..end);
        self.dot = Dot::new(start, start).clamp_to(self.lines.len());
    }
}

// Content store
impl Session {
    /// Save the buffer to the content store and return its hash.
    pub fn save(&mut self) -> Result<String> {
        let text = self.text();
        let store = self.store()?;
        let hash = store
            .put(&text)
            .with_context(|| format!("saving buffer to {}", store.root().display()))?;
        debug!(%hash, "saved buffer");
        Ok(hash)
    }

    pub fn save_and_pin(&mut self) -> Result<String> {
        let hash = self.save()?;
        self.store()?.pin(&hash)?;
        Ok(hash)
    }

    /// The content store, opened on first use.
    pub fn store(&mut self) -> Result<&ContentStore> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let root = &self.config.cas_root;
                ContentStore::open(root)
                    .with_context(|| format!("opening content store at {}", root.display()))?
            }
        };
        Ok(self.store.insert(store))
    }
}

/// The command text of a `sh:` or `> sh:` line.
fn shell_command(input: &str) -> Option<&str> {
    input
        .strip_prefix("> sh:")
        .or_else(|| input.strip_prefix("sh:"))
        .map(str::trim)
}
