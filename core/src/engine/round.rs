use crate::collab::{collect_reply, Collaborator};
use crate::document::Document;
use crate::engine::patch::{patch, PatchReport};
use crate::error::{EditError, ErrorCode, Result};
use crate::logger::Logger;
use crate::parse::{parse_reply, EditInstructions};
use crate::prompts::build_edit_request;
use crate::segment::{detect_indentation, segment_with_unit};
use crate::tag::{tag, IdentifierSource, TaggedDocument};

const MAX_INSTRUCTION_SIZE: usize = 100_000;

/// Everything one round produced, ready for the human to accept or reject.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub instruction: String,
    pub tagged: TaggedDocument,
    pub reply: String,
    pub edits: EditInstructions,
    pub report: PatchReport,
    /// The proposed final text.
    pub text: String,
}

impl Proposal {
    pub fn changes(&self, document: &Document) -> bool {
        self.text != document.text()
    }
}

/// Segment, tag, ask the collaborator, parse its reply, patch.
///
/// Reply fragments are forwarded to `on_fragment` as they arrive; parsing
/// waits for the whole reply.
pub fn process_round(
    document: &Document,
    instruction: &str,
    collaborator: &dyn Collaborator,
    ids: &mut dyn IdentifierSource,
    logger: &Logger,
    on_fragment: &mut dyn FnMut(&str),
) -> Result<Proposal> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(EditError::Validation {
            code: ErrorCode::ValidationFailed,
            message: "Instruction is empty".to_string(),
            context: "instruction".to_string(),
        });
    }
    if instruction.len() > MAX_INSTRUCTION_SIZE {
        return Err(EditError::Validation {
            code: ErrorCode::BoundsExceeded,
            message: format!("Instruction exceeds max size {}", MAX_INSTRUCTION_SIZE),
            context: "instruction".to_string(),
        });
    }

    let unit = detect_indentation(&document.lines());
    let segments = segment_with_unit(document.text(), unit);
    let tagged = tag(&segments, ids);
    logger.info(
        "round",
        "tagged",
        &format!(
            "indent unit {}, {} block(s) in {}",
            unit,
            tagged.blocks.len(),
            document.path().display()
        ),
    );

    let request = build_edit_request(&tagged, instruction);
    let reply = collect_reply(collaborator, &request, logger, on_fragment)?;

    let edits = parse_reply(&reply);
    logger.info(
        "round",
        "parsed",
        &format!("{} directive(s), {} distinct block(s)", edits.directive_count(), edits.len()),
    );

    let (text, report) = patch(&tagged, &edits);
    if !report.unresolved.is_empty() {
        let names: Vec<String> = report.unresolved.iter().map(ToString::to_string).collect();
        logger.info("round", "unresolved", &format!("ignored directive(s) for {}", names.join(", ")));
    }
    logger.info(
        "round",
        "patched",
        &format!("{} applied, {} kept", report.applied.len(), report.kept),
    );

    Ok(Proposal {
        instruction: instruction.to_string(),
        tagged,
        reply,
        edits,
        report,
        text,
    })
}
