/// Returns the text after the first `left` and before the next `right`.
///
/// An empty `left` starts at the beginning and an empty `right` runs to the end,
/// so both empty returns the input unchanged. A `right` that never appears after
/// `left` also runs to the end. Returns `None` only when a non-empty `left` is
/// not found.
///
/// # Example
/// ```
/// use bdo_recipe_watch::parsing::substring_between;
///
/// let tag = r#"<img src="/items/new_icon/03_etc/07_productmaterial/00009213.png">"#;
/// assert_eq!(
///     substring_between(tag, "src=\"", "\""),
///     Some("/items/new_icon/03_etc/07_productmaterial/00009213.png")
/// );
/// ```
pub fn substring_between<'a>(text: &'a str, left: &str, right: &str) -> Option<&'a str> {
    let start = if left.is_empty() {
        0
    } else {
        text.find(left)? + left.len()
    };

    let end = if right.is_empty() {
        text.len()
    } else {
        text[start..]
            .find(right)
            .map(|offset| start + offset)
            .unwrap_or(text.len())
    };

    Some(&text[start..end])
}

/// Parses the number embedded in free text, e.g. `"12.5 silver"` or `"1,200"`.
///
/// Every character that is not an ASCII digit or `.` is dropped first. The
/// longest numeric prefix of what remains is parsed, so `"1.2.3"` yields `1.2`.
/// Returns `fallback` if nothing parses.
pub fn parse_number(text: &str, fallback: f64) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    // Cut at the second '.', anything after it can't be part of the number
    let numeric = match cleaned.match_indices('.').nth(1) {
        Some((idx, _)) => &cleaned[..idx],
        None => cleaned.as_str(),
    };

    match numeric.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_between_both_markers() {
        let html = r#"<span class="item_grade_3 quality">Beer</span>"#;
        assert_eq!(substring_between(html, "item_grade_", " "), Some("3"));
    }

    #[test]
    fn test_substring_between_searches_right_after_left() {
        // The first '"' in the string comes before src=, it must be ignored
        let text = r#"<div class="x"><img src="/a.png" alt="a"></div>"#;
        assert_eq!(substring_between(text, "src=\"", "\""), Some("/a.png"));
    }

    #[test]
    fn test_substring_between_missing_right_runs_to_end() {
        assert_eq!(substring_between("item_grade_2", "item_grade_", " "), Some("2"));
    }

    #[test]
    fn test_substring_between_missing_left() {
        assert_eq!(substring_between("no grade here", "item_grade_", " "), None);
    }

    #[test]
    fn test_substring_between_empty_boundaries() {
        assert_eq!(substring_between("unchanged", "", ""), Some("unchanged"));
        assert_eq!(substring_between("key=value", "key=", ""), Some("value"));
        assert_eq!(substring_between("key=value", "", "="), Some("key"));
    }

    #[test]
    fn test_substring_between_adjacent_markers() {
        assert_eq!(substring_between(r#"src="""#, "src=\"", "\""), Some(""));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12.5 silver", 0.0), 12.5);
        assert_eq!(parse_number("abc", 0.0), 0.0);
        assert_eq!(parse_number("", 1.0), 1.0);
    }

    #[test]
    fn test_parse_number_strips_separators() {
        assert_eq!(parse_number("1,200", 0.0), 1200.0);
        assert_eq!(parse_number("x 3", 1.0), 3.0);
        assert_eq!(parse_number("Lv 15", 0.0), 15.0);
    }

    #[test]
    fn test_parse_number_multiple_dots() {
        assert_eq!(parse_number("1.2.3", 0.0), 1.2);
        assert_eq!(parse_number(".", 7.0), 7.0);
        assert_eq!(parse_number(".5", 0.0), 0.5);
    }
}
