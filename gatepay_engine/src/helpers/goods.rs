/// GatePay rejects goods names longer than this many characters.
pub const GOODS_NAME_LIMIT: usize = 140;
pub const ELLIPSIS: &str = "...";

/// Joins the product titles with `", "` and fits the result into [`GOODS_NAME_LIMIT`] characters.
pub fn goods_name<S: AsRef<str>>(titles: &[S]) -> String {
    let joined = titles.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(", ");
    limit_goods_name(&joined, GOODS_NAME_LIMIT)
}

/// Shortens `s` to at most `limit` characters without cutting a word in half.
///
/// Strings that already fit are returned unchanged. Otherwise whole words, split on spaces, are kept for as long as
/// they and a trailing [`ELLIPSIS`] fit, and the ellipsis is appended. A dangling list separator before the ellipsis
/// is dropped. Lengths are counted in characters, not bytes.
pub fn limit_goods_name(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let budget = limit.saturating_sub(ELLIPSIS.chars().count());
    let mut kept_chars = 0;
    let mut end = 0;
    for (i, word) in s.split(' ').enumerate() {
        let sep = usize::from(i > 0);
        let len = word.chars().count() + sep;
        if kept_chars + len > budget {
            break;
        }
        kept_chars += len;
        end += word.len() + sep;
    }
    let head = s[..end].trim_end_matches(|c: char| c == ',' || c == ' ');
    format!("{head}{ELLIPSIS}")
}

#[cfg(test)]
mod test {
    use super::*;

    fn words_are_whole(original: &str, truncated: &str) -> bool {
        let head = truncated.strip_suffix(ELLIPSIS).unwrap_or(truncated);
        let original_words = original.split(' ').collect::<Vec<_>>();
        head.split(' ')
            .filter(|w| !w.is_empty())
            .enumerate()
            .all(|(i, w)| original_words.get(i).map(|o| o.trim_end_matches(',') == w.trim_end_matches(',')).unwrap_or(false))
    }

    #[test]
    fn short_names_are_unchanged() {
        assert_eq!(goods_name(&["Beanie"]), "Beanie");
        assert_eq!(goods_name(&["Hat", "Scarf", "Gloves"]), "Hat, Scarf, Gloves");
        assert_eq!(goods_name::<&str>(&[]), "");
    }

    #[test]
    fn exactly_at_the_limit() {
        let s = "a".repeat(GOODS_NAME_LIMIT);
        assert_eq!(limit_goods_name(&s, GOODS_NAME_LIMIT), s);
        let s = format!("{} {}", "a".repeat(69), "b".repeat(70));
        assert_eq!(s.len(), 140);
        assert_eq!(limit_goods_name(&s, GOODS_NAME_LIMIT), s);
    }

    #[test]
    fn one_over_the_limit() {
        let s = format!("{} {}", "a".repeat(69), "b".repeat(71));
        assert_eq!(s.len(), 141);
        let result = limit_goods_name(&s, GOODS_NAME_LIMIT);
        assert_eq!(result, format!("{}...", "a".repeat(69)));
    }

    #[test]
    fn trailing_separator_is_dropped() {
        let titles = ["Woollen winter hat with extra long ear flaps"; 4];
        let result = goods_name(titles.as_slice());
        assert!(result.chars().count() <= GOODS_NAME_LIMIT);
        assert!(result.ends_with("flaps, Woollen winter hat with extra long ear flaps..."));
        assert!(!result.contains(",..."));
    }

    #[test]
    fn single_huge_word() {
        let s = "x".repeat(200);
        assert_eq!(limit_goods_name(&s, GOODS_NAME_LIMIT), "...");
    }

    #[test]
    fn multibyte_titles_count_characters() {
        let s = vec!["ñandú"; 30].join(" ");
        assert_eq!(s.chars().count(), 179);
        let result = limit_goods_name(&s, GOODS_NAME_LIMIT);
        assert!(result.chars().count() <= GOODS_NAME_LIMIT);
        assert!(result.ends_with("ñandú..."));
    }

    #[test]
    fn truncation_holds_for_every_length() {
        let vocabulary = ["Beanie", "Scarf", "Mittens", "Wool", "Socks", "X", "Thermal-Base-Layer", "Hat"];
        for n in 1..80 {
            let titles = (0..n).map(|i| vocabulary[(i * 7 + n) % vocabulary.len()]).collect::<Vec<_>>();
            let joined = titles.join(", ");
            let result = goods_name(titles.as_slice());
            if joined.chars().count() <= GOODS_NAME_LIMIT {
                assert_eq!(result, joined);
            } else {
                assert!(result.chars().count() <= GOODS_NAME_LIMIT, "{result}");
                assert!(result.ends_with(ELLIPSIS));
                assert!(words_are_whole(&joined, &result), "{joined} -> {result}");
            }
        }
    }
}
