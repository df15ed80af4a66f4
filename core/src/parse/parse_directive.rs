use crate::document::content_of;
use crate::parse::EditInstruction;
use crate::tag::Identifier;
use once_cell::sync::Lazy;
use regex::Regex;

static START_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*# EDIT_START:\s*(?P<id>\S+)\s*$").expect("start directive pattern")
});

static END_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*# EDIT_END:\s*(?P<id>\S+)\s*$").expect("end directive pattern")
});

pub fn start_id(line: &str) -> Option<&str> {
    START_LINE
        .captures(content_of(line))
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

fn end_id(line: &str) -> Option<&str> {
    END_LINE
        .captures(content_of(line))
        .and_then(|caps| caps.name("id"))
        .map(|m| m.as_str())
}

/// Reads the directive opening at `lines[at]`.
///
/// The body is at least one line and runs to the nearest end line naming the
/// same identifier after it; end lines for other identifiers are body text.
/// Returns the directive and the index of the first line after it, or `None`
/// when no matching end exists.
pub fn parse_directive(lines: &[&str], at: usize) -> Option<(EditInstruction, usize)> {
    let id = start_id(lines.get(at)?)?;
    let first_body = at + 1;

    let close = lines
        .get(first_body + 1..)?
        .iter()
        .position(|line| end_id(line) == Some(id))
        .map(|offset| first_body + 1 + offset)?;

    let body = lines[first_body..close]
        .iter()
        .map(|line| content_of(line))
        .collect::<Vec<_>>()
        .join("\n");

    Some((
        EditInstruction { id: Identifier::new(id), replacement: body },
        close + 1,
    ))
}
