use crate::document::{content_of, leading_whitespace, split_lines, terminator_of};
use crate::parse::EditInstructions;
use crate::tag::{marker_of, strip_markers, Identifier, Marker, TaggedDocument};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    /// Blocks replaced, in document order.
    pub applied: Vec<Identifier>,
    /// Blocks left verbatim.
    pub kept: usize,
    /// Directive identifiers that name no block.
    pub unresolved: Vec<Identifier>,
}

/// Resolves every marker span against `edits`, then strips all markers.
pub fn patch(tagged: &TaggedDocument, edits: &EditInstructions) -> (String, PatchReport) {
    let lines = split_lines(&tagged.text);
    let mut report = PatchReport::default();
    let mut resolved = String::with_capacity(tagged.text.len());
    let mut at = 0usize;

    while at < lines.len() {
        let line = lines[at];
        let Some(Marker::Start(id)) = marker_of(line) else {
            resolved.push_str(line);
            at += 1;
            continue;
        };
        let Some(close) = find_end(&lines, at + 1, id) else {
            resolved.push_str(line);
            at += 1;
            continue;
        };

        let block = &lines[at + 1..close];
        match edits.get(&Identifier::from(id)) {
            Some(replacement) => {
                resolved.push_str(&render_replacement(block, replacement));
                report.applied.push(Identifier::from(id));
            }
            None => {
                for kept in &lines[at..=close] {
                    resolved.push_str(kept);
                }
                report.kept += 1;
            }
        }
        at = close + 1;
    }

    report.unresolved = edits.ids().filter(|id| !tagged.contains(id)).cloned().collect();
    (strip_markers(&resolved), report)
}

fn find_end(lines: &[&str], from: usize, id: &str) -> Option<usize> {
    lines[from..]
        .iter()
        .position(|line| marker_of(line) == Some(Marker::End(id)))
        .map(|offset| from + offset)
}

/// Replacement lines carry the block's indentation and line terminator. The
/// replacement stands in for the whole span, blank-line padding included.
fn render_replacement(block: &[&str], replacement: &str) -> String {
    let first = block.first().copied().unwrap_or("");
    let indent = leading_whitespace(first);
    let eol = if first.is_empty() { "\n" } else { terminator_of(first) };

    let mut out = String::with_capacity(replacement.len() + indent.len());
    for line in replacement.split('\n').map(content_of) {
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push_str(eol);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_reply;
    use crate::tag::{tag_text, SequentialIds};

    const GREET: &str = "def greet(name):\n    print(\"hello \" + name)\n\ndef add(a, b):\n    return a + b\n";

    fn run(text: &str, reply: &str) -> (String, PatchReport) {
        let tagged = tag_text(text, &mut SequentialIds::default());
        patch(&tagged, &parse_reply(reply))
    }

    #[test]
    fn replaces_one_function_and_keeps_the_other() {
        let reply = "# EDIT_START: u1\ndef greet(name):\n    print(f\"hello {name}\")\n# EDIT_END: u1\n";
        let (out, report) = run(GREET, reply);
        assert_eq!(
            out,
            "def greet(name):\n    print(f\"hello {name}\")\n\ndef add(a, b):\n    return a + b\n"
        );
        assert_eq!(report.applied, vec![Identifier::from("u1")]);
        assert_eq!(report.kept, 1);
        assert!(report.unresolved.is_empty());
    }

    #[test]
    fn empty_edit_set_is_identity() {
        let text = "import os\n\nclass A:\n    x = 1\n\n\n    def f(self):\n        pass\n";
        let (out, report) = run(text, "no edits, sorry");
        assert_eq!(out, text);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn replacement_takes_the_block_indentation() {
        let text = "class A:\n    x = 1\n    y = 2\n";
        let reply = "# EDIT_START: u1\nx = 10\n\ny = 20\n# EDIT_END: u1\n";
        let (out, _) = run(text, reply);
        assert_eq!(out, "class A:\n    x = 10\n\n    y = 20\n");
    }

    #[test]
    fn indented_replacement_is_prefixed_as_given() {
        let text = "class A:\n    x = 1\n";
        let reply = "# EDIT_START: u1\n  x = 10\n  y = 20\n# EDIT_END: u1\n";
        let (out, _) = run(text, reply);
        assert_eq!(out, "class A:\n      x = 10\n      y = 20\n");
    }

    #[test]
    fn whitespace_only_lines_come_out_empty() {
        let text = "class A:\n    x = 1\n";
        let reply = "# EDIT_START: u1\nx = 2\n   \ny = 3\n# EDIT_END: u1\n";
        let (out, _) = run(text, reply);
        assert_eq!(out, "class A:\n    x = 2\n\n    y = 3\n");
    }

    #[test]
    fn unknown_identifier_changes_nothing() {
        let reply = "# EDIT_START: nope\nboom\n# EDIT_END: nope\n";
        let (out, report) = run(GREET, reply);
        assert_eq!(out, GREET);
        assert_eq!(report.unresolved, vec![Identifier::from("nope")]);
    }

    #[test]
    fn last_duplicate_directive_is_applied() {
        let reply = "# EDIT_START: u2\ndef add(a, b):\n    return 0\n# EDIT_END: u2\n\
                     # EDIT_START: u2\ndef add(a, b):\n    return b + a\n# EDIT_END: u2\n";
        let (out, _) = run(GREET, reply);
        assert!(out.ends_with("def add(a, b):\n    return b + a\n"));
        assert!(!out.contains("return 0"));
    }

    #[test]
    fn replacement_covers_statement_padding() {
        let text = "class A:\n    x = 1\n\n\nb = 2\n";
        let reply = "# EDIT_START: u1\nx = 5\n# EDIT_END: u1\n";
        let (out, _) = run(text, reply);
        assert_eq!(out, "class A:\n    x = 5\nb = 2\n");
    }

    #[test]
    fn echoed_statement_block_is_identity() {
        let text = "class A:\n    x = 1\n\n\nb = 2\n";
        let reply = "# EDIT_START: u1\nx = 1\n\n\n# EDIT_END: u1\n";
        let (out, report) = run(text, reply);
        assert_eq!(out, text);
        assert_eq!(report.applied, vec![Identifier::from("u1")]);
    }

    #[test]
    fn back_to_back_directive_lines_are_not_an_edit() {
        let (out, report) = run(GREET, "# EDIT_START: u2\n# EDIT_END: u2\n");
        assert_eq!(out, GREET);
        assert!(report.applied.is_empty());
    }

    #[test]
    fn stray_markers_in_replacement_are_stripped() {
        let reply = "# EDIT_START: u1\n# UID_START_u1\ndef greet(name):\n    pass\n# UID_END_u1\n# EDIT_END: u1\n";
        let (out, _) = run(GREET, reply);
        assert!(out.starts_with("def greet(name):\n    pass\n\ndef add"));
        assert!(!out.contains("UID_"));
    }

    #[test]
    fn crlf_blocks_get_crlf_replacements() {
        let text = "def f():\r\n    return 1\r\n";
        let reply = "# EDIT_START: u1\ndef f():\n    return 2\n# EDIT_END: u1\n";
        let (out, _) = run(text, reply);
        assert_eq!(out, "def f():\r\n    return 2\r\n");
    }
}
