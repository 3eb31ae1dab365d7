pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Short content snippet for list rows. Cuts on a char boundary and appends
/// an ellipsis when truncated.
pub(crate) fn content_preview(s: &str, max_chars: usize) -> String {
    let trimmed = s.trim();
    let mut out: String = trimmed.chars().take(max_chars).collect();
    if trimmed.chars().count() > max_chars {
        out.push('…');
    }
    out
}

/// Comma-separated tag input, normalized. `None` when nothing usable remains.
pub(crate) fn parse_tags(raw: &str) -> Option<Vec<String>> {
    let tags: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_strings_intact() {
        assert_eq!(content_preview("hello", 10), "hello");
    }

    #[test]
    fn preview_truncates_with_ellipsis() {
        assert_eq!(content_preview("hello world", 5), "hello…");
    }

    #[test]
    fn preview_is_char_boundary_safe() {
        assert_eq!(content_preview("héllо wörld", 4), "héll…");
    }

    #[test]
    fn tags_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_tags(" rust , , cli,"),
            Some(vec!["rust".to_string(), "cli".to_string()])
        );
    }

    #[test]
    fn blank_tag_input_is_none() {
        assert_eq!(parse_tags("  , ,"), None);
        assert_eq!(parse_tags(""), None);
    }
}
