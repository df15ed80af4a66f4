use crate::parse::{EDIT_END, EDIT_START};
use crate::tag::{TaggedDocument, END_MARKER, START_MARKER};

pub const SYSTEM_FRAMING: &str =
    "You are an expert Python programmer that is helping with editing code.";

/// One request to the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub system: String,
    pub user: String,
}

/// Frames the tagged document and the instruction with the reply contract.
#[must_use]
pub fn build_edit_request(tagged: &TaggedDocument, instruction: &str) -> EditRequest {
    let example_id = "1a2b3c4d";
    let user = [
        "Please review the following Python code and make minimal edits according to the instructions provided.".to_string(),
        format!(
            "Blocks of the code are wrapped in markers: `{START_MARKER}<ID>` opens a block and `{END_MARKER}<ID>` closes it."
        ),
        String::new(),
        "Use the following edit scheme to specify each edit:".to_string(),
        "1. Find the ID of the block you want to change.".to_string(),
        format!("2. Write a line `{EDIT_START} <ID>`."),
        "3. Write the complete new code for that block.".to_string(),
        format!("4. Write a line `{EDIT_END} <ID>`."),
        String::new(),
        format!("For example, to replace the block with ID '{example_id}':"),
        String::new(),
        format!("{EDIT_START} {example_id}"),
        "New code goes here".to_string(),
        format!("{EDIT_END} {example_id}"),
        String::new(),
        "Rules:".to_string(),
        "- The new code replaces the whole block, so include every line the block should keep.".to_string(),
        "- Do not include the block markers in the new code.".to_string(),
        "- Write the new code without the block's leading indentation; it is added back for you.".to_string(),
        "- Only include the edits. Do not repeat unchanged blocks or these instructions.".to_string(),
        "- You may think step by step and explain your edits before the edit blocks; that text is ignored.".to_string(),
        String::new(),
        format!("Instructions: {}", instruction.trim()),
        String::new(),
        "Original code with markers:".to_string(),
        String::new(),
        "```".to_string(),
        tagged.text.trim_end_matches(['\r', '\n']).to_string(),
        "```".to_string(),
    ]
    .join("\n");

    EditRequest { system: SYSTEM_FRAMING.to_string(), user }
}
