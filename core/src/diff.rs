use similar::{ChangeTag, TextDiff};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeSummary {
    pub inserted: usize,
    pub deleted: usize,
    pub total_lines: usize,
}

impl ChangeSummary {
    pub fn is_unchanged(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }

    pub fn percent_changed(&self) -> f32 {
        let changed = self.inserted.max(self.deleted);
        (changed as f32 / self.total_lines.max(1) as f32) * 100.0
    }
}

pub fn summarize(original: &str, proposed: &str) -> ChangeSummary {
    let diff = TextDiff::from_lines(original, proposed);
    let mut summary = ChangeSummary {
        inserted: 0,
        deleted: 0,
        total_lines: proposed.lines().count(),
    };
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => summary.inserted += 1,
            ChangeTag::Delete => summary.deleted += 1,
            ChangeTag::Equal => {}
        }
    }
    summary
}

/// Unified diff with three lines of context, labelled with `name`.
pub fn unified(original: &str, proposed: &str, name: &str) -> String {
    TextDiff::from_lines(original, proposed)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{name}"), &format!("b/{name}"))
        .to_string()
}
