/// Longest prefix of `s` that fits in `max_bytes` without splitting a char.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    match s.char_indices().find(|(i, c)| i + c.len_utf8() > max_bytes) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Unwrap a reply fenced as a markdown code block.
///
/// Models asked for bare JSON still wrap it in ```` ```json ```` (or
/// ```` ```JSON ````, or a plain fence) often enough that callers should
/// always pass replies through here. Text without a leading fence is only
/// trimmed.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.find('\n') {
        Some(nl) if rest[..nl].chars().all(|c| c.is_ascii_alphanumeric()) => &rest[nl + 1..],
        _ => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}
