//! Plain-text rendering of search results.
use crate::logs::LogKind;
use crate::search::SearchResult;

/// Render per-file results as output lines.
///
/// The default mode shows full grouped conversations plus any unmatched
/// orphan lines; `matching_only` collapses each file to the rows that
/// directly matched the term.
#[must_use]
pub fn render_search_results(
    results: &[SearchResult],
    kind: LogKind,
    matching_only: bool,
) -> Vec<String> {
    let label = kind.result_label();
    let mut rendered: Vec<String> = Vec::new();

    for result in results {
        let file_name = result
            .log_path
            .file_name()
            .map_or_else(|| result.log_path.display().to_string(), |n| {
                n.to_string_lossy().into_owned()
            });
        rendered.push(format!("=== {file_name} ==="));

        if matching_only {
            rendered.push(format!(
                "Search term '{}' -> {} matching row(s)",
                result.term,
                result.matching_rows.len()
            ));
            for (line_number, line) in &result.matching_rows {
                rendered.push(format!("{line_number}: {line}"));
            }
            continue;
        }

        rendered.push(format!(
            "Search term '{}' -> {} {label}(s)",
            result.term,
            result.total_conversations()
        ));
        if result.conversations.is_empty() && result.orphan_matches.is_empty() {
            rendered.push("No matches found.".to_string());
        }

        for conversation in &result.conversations {
            rendered.push(String::new());
            if label == "conversation" {
                rendered.push(format!(
                    "-- conversation {} (line {}) --",
                    conversation.flow_id, conversation.first_line_number
                ));
            }
            rendered.extend(conversation.lines.iter().cloned());
        }

        if !result.orphan_matches.is_empty() {
            rendered.push(String::new());
            rendered.push("-- unmatched lines --".to_string());
            for (line_number, line) in &result.orphan_matches {
                rendered.push(format!("{line_number}: {line}"));
            }
        }
    }

    rendered
}
