//! A text console core: a Sam-style line editor and a content-addressed store.
//!
//! # Example
//!
//! ```rust
//! use conch::{Dot, apply};
//!
//! let lines: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
//!
//! // Append after line 2; the dot selects the new line.
//! let (lines, dot) = apply("2a/Hello/", &lines, Dot::zero()).unwrap();
//! assert_eq!(lines, ["x", "y", "Hello", "z"]);
//! assert_eq!(dot, Dot::new(2, 3));
//!
//! // Without an address, text commands act on the first line of the dot.
//! let (lines, _) = apply("s/Hello/Goodbye/", &lines, dot).unwrap();
//! assert_eq!(lines[2], "Goodbye");
//! ```

pub mod command;
mod config;
mod dot;
mod edit_mode;
mod error;
pub mod interpreter;
pub mod parser;
mod render;
mod session;
pub mod store;
mod substitute;

pub use command::{Address, ParsedCommand, Verb};
pub use config::Config;
pub use dot::Dot;
pub use edit_mode::InputMode;
pub use error::{EditError, StoreError};
pub use interpreter::{apply, apply_to_text, split_lines};
pub use parser::{is_command, parse_command};
pub use render::{highlighted, render_lines};
pub use session::{ChatModel, Session, Shell};
pub use store::{ContentStore, MAX_SIZE, hash_content};
pub use substitute::Substitution;
