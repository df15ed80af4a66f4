//! Partitions a document into addressable blocks.
//!
//! Shapes are tried at each line in priority order (function, then statement);
//! the first that matches wins and the scan resumes after it. Lines neither
//! shape claims pass through untouched.

use crate::document::{leading_whitespace, split_lines};

pub mod segment_indent;
pub mod segment_shapes;

pub use segment_indent::{detect_indentation, DEFAULT_INDENT_UNIT};
use segment_shapes::{match_function, match_statement, ShapeMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockShape {
    Function,
    Statement,
}

/// One addressable block, borrowed from the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block<'a> {
    pub shape: BlockShape,
    /// Raw text including any blank-line padding.
    pub text: &'a str,
    body_len: usize,
}

impl<'a> Block<'a> {
    /// The block without its trailing blank-line padding.
    pub fn body(&self) -> &'a str {
        &self.text[..self.body_len]
    }

    pub fn padding(&self) -> &'a str {
        &self.text[self.body_len..]
    }

    /// Whitespace prefix of the block's first line.
    pub fn indent(&self) -> &'a str {
        leading_whitespace(self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Block(Block<'a>),
    Plain(&'a str),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Block(block) => block.text,
            Segment::Plain(text) => *text,
        }
    }
}

/// Segments `text` using its detected indentation unit.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let lines = split_lines(text);
    let unit = detect_indentation(&lines);
    segment_lines(text, &lines, unit)
}

pub fn segment_with_unit(text: &str, unit: usize) -> Vec<Segment<'_>> {
    let lines = split_lines(text);
    segment_lines(text, &lines, unit)
}

fn segment_lines<'a>(text: &'a str, lines: &[&'a str], unit: usize) -> Vec<Segment<'a>> {
    let unit = unit.max(1);
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    let mut pos = 0usize;
    offsets.push(pos);
    for line in lines {
        pos += line.len();
        offsets.push(pos);
    }

    let mut out = Vec::new();
    let mut plain_from: Option<usize> = None;
    let mut at = 0usize;

    while at < lines.len() {
        let matched = match_function(lines, at, unit)
            .map(|m| (BlockShape::Function, m))
            .or_else(|| match_statement(lines, at, unit).map(|m| (BlockShape::Statement, m)));

        let Some((shape, ShapeMatch { body_end, end })) = matched else {
            plain_from.get_or_insert(at);
            at += 1;
            continue;
        };

        if let Some(from) = plain_from.take() {
            out.push(Segment::Plain(&text[offsets[from]..offsets[at]]));
        }
        out.push(Segment::Block(Block {
            shape,
            text: &text[offsets[at]..offsets[end]],
            body_len: offsets[body_end] - offsets[at],
        }));
        at = end;
    }

    if let Some(from) = plain_from {
        out.push(Segment::Plain(&text[offsets[from]..]));
    }
    out
}

pub fn blocks<'a>(segments: &'a [Segment<'a>]) -> impl Iterator<Item = &'a Block<'a>> {
    segments.iter().filter_map(|s| match s {
        Segment::Block(block) => Some(block),
        Segment::Plain(_) => None,
    })
}
