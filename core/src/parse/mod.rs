//! Extracts edit directives from a collaborator reply.
//!
//! Reply shape:
//!
//! ```text
//! # EDIT_START: <identifier>
//! <replacement lines>
//! # EDIT_END: <identifier>
//! ```
//!
//! Anything outside a directive is reasoning prose and ignored. Later
//! directives for the same identifier replace earlier ones.

use crate::document::split_lines;
use crate::tag::Identifier;
use std::collections::HashMap;

pub mod parse_directive;

pub const EDIT_START: &str = "# EDIT_START:";
pub const EDIT_END: &str = "# EDIT_END:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditInstruction {
    pub id: Identifier,
    pub replacement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditInstructions {
    edits: HashMap<Identifier, String>,
    /// Identifiers in first-seen order.
    order: Vec<Identifier>,
    directives: usize,
}

impl EditInstructions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a directive; a later one for the same identifier wins.
    pub fn insert(&mut self, edit: EditInstruction) {
        self.directives += 1;
        if !self.edits.contains_key(&edit.id) {
            self.order.push(edit.id.clone());
        }
        self.edits.insert(edit.id, edit.replacement);
    }

    pub fn get(&self, id: &Identifier) -> Option<&str> {
        self.edits.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Directives seen, duplicates included.
    pub fn directive_count(&self) -> usize {
        self.directives
    }

    pub fn ids(&self) -> impl Iterator<Item = &Identifier> {
        self.order.iter()
    }
}

impl FromIterator<EditInstruction> for EditInstructions {
    fn from_iter<I: IntoIterator<Item = EditInstruction>>(iter: I) -> Self {
        let mut edits = Self::new();
        for edit in iter {
            edits.insert(edit);
        }
        edits
    }
}

/// Scans a fully assembled reply for directives.
pub fn parse_reply(reply: &str) -> EditInstructions {
    let lines = split_lines(reply);
    let mut edits = EditInstructions::new();
    let mut at = 0usize;

    while at < lines.len() {
        match parse_directive::parse_directive(&lines, at) {
            Some((edit, next)) => {
                edits.insert(edit);
                at = next;
            }
            None => at += 1,
        }
    }
    edits
}
