//! Comment stripping for NC program lines

/// Strip comments from a raw program line.
///
/// Removes everything after a `;`, then every `(...)` span, left to right.
/// An unclosed `(` drops the rest of the line. Returns `None` when nothing
/// but whitespace remains.
pub fn normalize_line(raw: &str) -> Option<String> {
    let line = raw.trim();
    if line.is_empty() {
        return None;
    }

    let line = match line.find(';') {
        Some(idx) => &line[..idx],
        None => line,
    };

    let mut cleaned = line.to_string();
    while let Some(open) = cleaned.find('(') {
        match cleaned[open + 1..].find(')') {
            Some(rel) => {
                let close = open + 1 + rel;
                cleaned.replace_range(open..=close, "");
            }
            None => {
                cleaned.truncate(open);
                break;
            }
        }
    }

    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
