use crate::document::{content_of, terminator_of};
use crate::segment::{segment, BlockShape, Segment};
use std::collections::HashSet;
use std::fmt;

pub const START_MARKER: &str = "# UID_START_";
pub const END_MARKER: &str = "# UID_END_";

pub const IDENTIFIER_LEN: usize = 8;

/// Draws from the source before falling back to counter-derived identifiers.
const MAX_DRAWS_PER_BLOCK: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

pub trait IdentifierSource {
    /// A candidate; the tagger discards candidates already in use.
    fn draw(&mut self) -> Identifier;
}

/// First eight hex digits of a v4 UUID.
#[derive(Debug, Default)]
pub struct RandomIds;

impl IdentifierSource for RandomIds {
    fn draw(&mut self) -> Identifier {
        let uuid = uuid::Uuid::new_v4().simple().to_string();
        Identifier(uuid[..IDENTIFIER_LEN].to_string())
    }
}

/// `u1`, `u2`, ... for reproducible rounds.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: usize,
}

impl IdentifierSource for SequentialIds {
    fn draw(&mut self) -> Identifier {
        self.next += 1;
        Identifier(format!("u{}", self.next))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedBlock {
    pub id: Identifier,
    pub shape: BlockShape,
    pub indent: String,
    pub line_count: usize,
}

/// Document text with every block wrapped in start/end markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedDocument {
    pub text: String,
    pub blocks: Vec<TaggedBlock>,
}

impl TaggedDocument {
    pub fn contains(&self, id: &Identifier) -> bool {
        self.blocks.iter().any(|b| &b.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    Start(&'a str),
    End(&'a str),
}

/// Recognizes a marker line, ignoring surrounding whitespace.
pub fn marker_of(line: &str) -> Option<Marker<'_>> {
    let content = content_of(line).trim();
    if let Some(id) = content.strip_prefix(START_MARKER) {
        return (!id.is_empty()).then_some(Marker::Start(id));
    }
    if let Some(id) = content.strip_prefix(END_MARKER) {
        return (!id.is_empty()).then_some(Marker::End(id));
    }
    None
}

pub fn tag_text(text: &str, ids: &mut dyn IdentifierSource) -> TaggedDocument {
    tag(&segment(text), ids)
}

pub fn tag(segments: &[Segment<'_>], ids: &mut dyn IdentifierSource) -> TaggedDocument {
    let mut used: HashSet<Identifier> = HashSet::new();
    let mut fallback = 0u32;
    let mut text = String::new();
    let mut blocks = Vec::new();

    for seg in segments {
        let block = match seg {
            Segment::Plain(plain) => {
                text.push_str(plain);
                continue;
            }
            Segment::Block(block) => block,
        };

        let id = unique_id(ids, &used, &mut fallback);
        used.insert(id.clone());

        let eol = block.text.split_inclusive('\n').next().map_or("\n", terminator_of);
        text.push_str(START_MARKER);
        text.push_str(id.as_str());
        text.push_str(eol);
        text.push_str(block.text);
        text.push_str(END_MARKER);
        text.push_str(id.as_str());
        text.push_str(eol);

        blocks.push(TaggedBlock {
            id,
            shape: block.shape,
            indent: block.indent().to_string(),
            line_count: block.text.split_inclusive('\n').count(),
        });
    }

    TaggedDocument { text, blocks }
}

fn unique_id(
    ids: &mut dyn IdentifierSource,
    used: &HashSet<Identifier>,
    fallback: &mut u32,
) -> Identifier {
    for _ in 0..MAX_DRAWS_PER_BLOCK {
        let candidate = ids.draw();
        if !candidate.as_str().is_empty() && !used.contains(&candidate) {
            return candidate;
        }
    }
    loop {
        *fallback = fallback.wrapping_add(1);
        let candidate = Identifier(format!("{:08x}", *fallback));
        if !used.contains(&candidate) {
            return candidate;
        }
    }
}

/// Drops every marker line, matched or not.
pub fn strip_markers(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| marker_of(line).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREET: &str = "def greet(name):\n    print(\"hello \" + name)\n\ndef add(a, b):\n    return a + b\n";

    struct Stuck;

    impl IdentifierSource for Stuck {
        fn draw(&mut self) -> Identifier {
            Identifier::from("same")
        }
    }

    #[test]
    fn wraps_each_block_in_markers() {
        let tagged = tag_text(GREET, &mut SequentialIds::default());
        assert_eq!(
            tagged.text,
            "# UID_START_u1\ndef greet(name):\n    print(\"hello \" + name)\n# UID_END_u1\n\n\
             # UID_START_u2\ndef add(a, b):\n    return a + b\n# UID_END_u2\n"
        );
        assert_eq!(tagged.blocks.len(), 2);
        assert_eq!(tagged.blocks[1].line_count, 2);
    }

    #[test]
    fn stripping_markers_restores_the_original() {
        let text = "import os\n\nclass A:\n    x = 1   \n\n\n    def f(self):\n        pass\n\ntail";
        let tagged = tag_text(text, &mut RandomIds);
        assert!(!tagged.blocks.is_empty());
        assert_eq!(strip_markers(&tagged.text), text);
    }

    #[test]
    fn crlf_blocks_get_crlf_markers() {
        let text = "def f():\r\n    pass\r\n";
        let tagged = tag_text(text, &mut SequentialIds::default());
        assert_eq!(tagged.text, "# UID_START_u1\r\ndef f():\r\n    pass\r\n# UID_END_u1\r\n");
        assert_eq!(strip_markers(&tagged.text), text);
    }

    #[test]
    fn colliding_source_still_yields_unique_ids() {
        let text = "def a():\n    1\n\ndef b():\n    2\n\ndef c():\n    3\n";
        let tagged = tag_text(text, &mut Stuck);
        let ids: HashSet<_> = tagged.blocks.iter().map(|b| b.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(tagged.contains(&Identifier::from("same")));
    }

    #[test]
    fn random_ids_are_eight_hex_digits() {
        let id = RandomIds.draw();
        assert_eq!(id.as_str().len(), IDENTIFIER_LEN);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn marker_lines_are_recognized() {
        assert_eq!(marker_of("# UID_START_ab12\n"), Some(Marker::Start("ab12")));
        assert_eq!(marker_of("    # UID_END_ab12\r\n"), Some(Marker::End("ab12")));
        assert_eq!(marker_of("# UID_START_\n"), None);
        assert_eq!(marker_of("x = 1  # note\n"), None);
    }

    #[test]
    fn no_blocks_means_no_markers() {
        let tagged = tag_text("a = 1\n", &mut RandomIds);
        assert!(tagged.blocks.is_empty());
        assert_eq!(tagged.text, "a = 1\n");
    }
}
