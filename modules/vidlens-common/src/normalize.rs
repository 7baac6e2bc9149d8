//! Normalized-string identity for entity names (trends, products,
//! strategies). Case-insensitive exact matching is the dedup contract —
//! deliberately not semantic similarity, which would silently change
//! aggregate frequencies.

/// Canonical form of an entity name: lowercased, trimmed, punctuation
/// stripped, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_was_space = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            last_was_space = false;
        } else if ch.is_whitespace() || ch == '-' || ch == '_' || ch == '/' {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
        }
        // Other punctuation is dropped entirely.
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Truncate text to a display snippet on a char boundary.
pub fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_is_case_insensitive() {
        assert_eq!(normalize_name("ChatGPT"), normalize_name("chatgpt"));
        assert_eq!(normalize_name("  AI Agents  "), "ai agents");
    }

    #[test]
    fn punctuation_and_separators_collapse() {
        assert_eq!(normalize_name("no-code tools!"), "no code tools");
        assert_eq!(normalize_name("B2B / SaaS"), "b2b saas");
        assert_eq!(normalize_name("what's new"), "whats new");
    }

    #[test]
    fn snippet_preserves_short_text() {
        assert_eq!(snippet("short", 10), "short");
    }

    #[test]
    fn snippet_truncates_long_text() {
        let s = snippet("a".repeat(200).as_str(), 20);
        assert!(s.chars().count() <= 20);
        assert!(s.ends_with('…'));
    }
}
