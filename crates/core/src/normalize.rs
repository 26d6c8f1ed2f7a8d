/// Trims and lowercases a raw answer. Absent answers normalize to `""`.
pub fn normalize(value: Option<&str>) -> String {
    match value {
        Some(value) => value.trim().to_lowercase(),
        None => String::new(),
    }
}

/// Substring match against a keyword set, after normalization.
///
/// There is no word-boundary check: `"21"` matches inside `"21-25"`, so
/// keyword sets have to be chosen to avoid unintended overlaps.
pub fn contains_any(value: Option<&str>, keywords: &[&str]) -> bool {
    let Some(value) = value else {
        return false;
    };

    let normalized = normalize(Some(value));
    keywords.iter().any(|keyword| normalized.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_empty() {
        assert_eq!(normalize(None), "");
        assert!(!contains_any(None, &["irregular"]));
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(normalize(Some("  Very Heavy \n")), "very heavy");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["", "  MiXeD  ", "26-30 Days", "\tTEEN\t"] {
            let once = normalize(Some(raw));
            assert_eq!(normalize(Some(&once)), once);
        }
    }

    #[test]
    fn matches_substrings_case_insensitively() {
        assert!(contains_any(
            Some("Irregular (varies month to month)"),
            &["irregular"]
        ));
        assert!(contains_any(Some("21-25 days"), &["21"]));
        assert!(!contains_any(Some("21-25 days"), &["less than 21"]));
    }

    #[test]
    fn empty_keyword_set_never_matches() {
        assert!(!contains_any(Some("anything"), &[]));
    }
}
