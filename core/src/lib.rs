#![deny(warnings)]

//! Block tagging and patch reconciliation for collaborator-driven source edits.
//!
//! A round segments a document into indentation-based blocks, wraps each in
//! `# UID_START_<id>` / `# UID_END_<id>` markers, asks a collaborator for
//! `# EDIT_START: <id>` ... `# EDIT_END: <id>` directives, and splices the
//! replacements back. Text outside edited blocks is returned byte-for-byte.

pub mod collab;
pub mod config;
pub mod diff;
pub mod document;
pub mod engine;
pub mod error;
pub mod logger;
pub mod parse;
pub mod prompts;
pub mod segment;
pub mod session;
pub mod tag;

pub use collab::{Collaborator, OpenAiCollaborator, ScriptedCollaborator};
pub use config::Config;
pub use document::Document;
pub use engine::{commit, patch, process_round, PatchReport, Proposal};
pub use error::{EditError, ErrorCode, Result};
pub use logger::Logger;
pub use parse::{parse_reply, EditInstruction, EditInstructions};
pub use session::Session;
pub use tag::{tag_text, Identifier, IdentifierSource, RandomIds, SequentialIds, TaggedDocument};
