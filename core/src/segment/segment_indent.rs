pub const DEFAULT_INDENT_UNIT: usize = 4;

/// Most frequent non-zero count of leading spaces; ties go to the count seen first.
pub fn detect_indentation(lines: &[&str]) -> usize {
    // (indent, occurrences) in first-seen order
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for line in lines {
        let indent = line.bytes().take_while(|b| *b == b' ').count();
        if indent == 0 {
            continue;
        }
        match tally.iter_mut().find(|(width, _)| *width == indent) {
            Some((_, seen)) => *seen += 1,
            None => tally.push((indent, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (indent, seen) in tally {
        if best.map_or(true, |(_, top)| seen > top) {
            best = Some((indent, seen));
        }
    }
    best.map_or(DEFAULT_INDENT_UNIT, |(indent, _)| indent)
}
