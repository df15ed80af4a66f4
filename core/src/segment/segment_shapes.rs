use crate::document::{content_of, has_terminator, is_empty_line};
use once_cell::sync::Lazy;
use regex::Regex;

/// `def <anything>):` at column zero.
static FUNCTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^def .+\):$").expect("function header pattern"));

/// Number of blank lines a statement block takes as its separator.
const STATEMENT_PADDING: usize = 2;

/// Line range of one matched shape; `body_end..end` is the swallowed padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMatch {
    pub body_end: usize,
    pub end: usize,
}

pub fn is_function_header(line: &str) -> bool {
    has_terminator(line) && FUNCTION_HEADER.is_match(content_of(line))
}

/// Indented by at least `unit` spaces with something after them, and newline-terminated.
pub fn is_indented(line: &str, unit: usize) -> bool {
    let content = content_of(line);
    has_terminator(line)
        && content.len() > unit
        && content.as_bytes()[..unit].iter().all(|b| *b == b' ')
}

fn run_length(lines: &[&str], from: usize, unit: usize) -> usize {
    lines[from.min(lines.len())..]
        .iter()
        .take_while(|line| is_indented(line, unit))
        .count()
}

/// A header followed by indented runs; single blank lines between runs stay inside.
pub fn match_function(lines: &[&str], at: usize, unit: usize) -> Option<ShapeMatch> {
    if !is_function_header(lines.get(at)?) {
        return None;
    }

    let mut end = at + 1;
    let mut runs = 0usize;
    loop {
        let run = run_length(lines, end, unit);
        if run == 0 {
            break;
        }
        runs += 1;
        end += run;

        let gap_then_run = lines.get(end).is_some_and(|l| is_empty_line(l))
            && run_length(lines, end + 1, unit) > 0;
        if !gap_then_run {
            break;
        }
        end += 1;
    }

    (runs > 0).then_some(ShapeMatch { body_end: end, end })
}

/// A run of indented lines, plus exactly two trailing blank lines when present.
pub fn match_statement(lines: &[&str], at: usize, unit: usize) -> Option<ShapeMatch> {
    let run = run_length(lines, at, unit);
    if run == 0 {
        return None;
    }
    let body_end = at + run;
    let padded = (body_end..body_end + STATEMENT_PADDING)
        .all(|i| lines.get(i).is_some_and(|l| is_empty_line(l)));
    let end = if padded { body_end + STATEMENT_PADDING } else { body_end };
    Some(ShapeMatch { body_end, end })
}
