//! Parses zero-context unified diffs into deleted-line ranges.
//! No I/O - data in, data out.

use super::types::{DeletedLineHunk, ParsedDiff};

/// Collect the deleted-line hunks of a `-U0` diff.
///
/// Hunks that delete nothing are dropped; their presence is reported through
/// `has_only_added_hunks` instead.
pub fn parse_deleted_lines(diff: &str) -> ParsedDiff {
    let mut parsed = ParsedDiff::default();
    let mut filename = String::new();
    let mut current: Option<DeletedLineHunk> = None;
    // File headers only appear between `diff --git` and the first hunk
    let mut in_file_header = true;

    let finish = |parsed: &mut ParsedDiff, hunk: Option<DeletedLineHunk>| {
        if let Some(hunk) = hunk {
            if hunk.deleted_lines > 0 {
                parsed.hunks.push(hunk);
            } else {
                parsed.has_only_added_hunks = true;
            }
        }
    };

    for line in diff.lines() {
        if line.starts_with("diff --git") {
            finish(&mut parsed, current.take());
            in_file_header = true;
        } else if in_file_header && line.starts_with("--- ") {
            // Git appends a tab when the file name contains spaces
            filename = line.get(6..).unwrap_or("").trim_end_matches('\t').to_string();
        } else if line.starts_with("@@ ") {
            finish(&mut parsed, current.take());
            in_file_header = false;
            match parse_old_start(line) {
                Some(start_line) => {
                    current = Some(DeletedLineHunk {
                        filename: filename.clone(),
                        start_line,
                        deleted_lines: 0,
                    });
                }
                None => tracing::warn!("Unparseable hunk header: {}", line),
            }
        } else if line.starts_with('-') {
            if let Some(hunk) = current.as_mut() {
                hunk.deleted_lines += 1;
            }
        }
    }
    finish(&mut parsed, current.take());

    parsed
}

/// Pre-image start line of a hunk header such as `@@ -12,5 +12,3 @@`.
fn parse_old_start(line: &str) -> Option<u32> {
    let header = line.strip_prefix("@@ ")?;
    let (ranges, _) = header.split_once(" @@")?;
    let mut parts = ranges.split_whitespace();
    let old_part = parts.next()?.strip_prefix('-')?;
    let new_part = parts.next()?.strip_prefix('+')?;
    parse_range(new_part)?;
    parse_range(old_part).map(|(start, _)| start)
}

fn parse_range(input: &str) -> Option<(u32, u32)> {
    let mut iter = input.split(',');
    let start = iter.next()?.parse::<u32>().ok()?;
    let lines = match iter.next() {
        Some(count) => count.parse::<u32>().ok()?,
        None => 1,
    };
    Some((start, lines))
}
