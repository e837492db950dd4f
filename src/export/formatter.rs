//! Report formatting state machine
//!
//! A single left-to-right pass over the raw lines. Rule lines delimit
//! sections; only the section strictly between the 2nd and 3rd rule is
//! merged pairwise. This position-based rule is deliberate and must not
//! be generalized to other separator counts.

/// Append a final period unless the trimmed line already ends with
/// closing punctuation. Idempotent.
pub fn ensure_ends_with_dot(line: &str) -> String {
    let trimmed = line.trim();
    match trimmed.chars().last() {
        Some('.' | '!' | '?' | ',' | ':') => trimmed.to_string(),
        _ => format!("{trimmed}."),
    }
}

/// Reformat raw form text into the final report
pub fn format(text: &str) -> String {
    let mut result = String::new();
    let mut separator_count = 0usize;
    let mut in_target_section = false;
    let mut current_group: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        // marker lines become standalone headers, unnormalized
        if line.contains('#') {
            flush_group(&mut result, &mut current_group, true);
            let stripped = line.replace('#', "");
            result.push_str(stripped.trim());
            result.push('\n');
            continue;
        }

        if line.starts_with("----") {
            separator_count += 1;
            flush_group(&mut result, &mut current_group, true);
            // only the span between the 2nd and 3rd rule merges pairwise
            in_target_section = separator_count >= 2 && separator_count < 3;
            result.push_str(line);
            result.push_str("\n\n");
            continue;
        }

        if in_target_section {
            current_group.push(ensure_ends_with_dot(line));
        } else {
            result.push_str(&ensure_ends_with_dot(line));
            result.push('\n');
        }
    }

    flush_group(&mut result, &mut current_group, false);
    result.trim().to_string()
}

/// Emit the pending group; mid-stream flushes terminate with a newline
fn flush_group(result: &mut String, group: &mut Vec<String>, mid_stream: bool) {
    if group.is_empty() {
        return;
    }
    result.push_str(&format_line_group(group));
    if mid_stream {
        result.push('\n');
    }
    group.clear();
}

/// Join buffered lines two at a time, one output line per pair. An
/// unpaired final line is joined with the empty string, keeping the
/// trailing space from the join.
pub(crate) fn format_line_group(lines: &[String]) -> String {
    let mut out = String::new();
    for pair in lines.chunks(2) {
        let first = ensure_ends_with_dot(&pair[0]);
        let second = pair
            .get(1)
            .map(|line| ensure_ends_with_dot(line))
            .unwrap_or_default();
        out.push_str(&first);
        out.push(' ');
        out.push_str(&second);
        out.push('\n');
    }
    out
}
