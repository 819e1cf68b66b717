use std::sync::LazyLock;

use regex::Regex;

static SPECIAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s.,!?]").unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http\S+|www\S+").unwrap());
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip URLs and anything but word characters, whitespace and `. , ! ?`,
/// then collapse whitespace.
///
/// Special characters go first so that a mangled link such as `h@ttp://x`
/// still reads as a URL by the time URLs are removed.
pub fn clean_text(text: &str) -> String {
    let text = SPECIAL_RE.replace_all(text, "");
    let text = URL_RE.replace_all(&text, "");
    WS_RE.replace_all(&text, " ").trim().to_string()
}

/// True if `text` contains any of `keywords`, ignoring case.
pub fn contains_any_keyword<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .any(|kw| lower.contains(&kw.as_ref().to_lowercase()))
}

/// Keyword list folded to lowercase once, for the filtering pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    folded: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folded = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        KeywordSet { folded }
    }

    pub fn matches(&self, text: &str) -> bool {
        contains_any_keyword(text, &self.folded)
    }

    pub fn len(&self) -> usize {
        self.folded.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.folded.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || ".,!?".contains(c)
    }

    #[test]
    fn strips_urls() {
        let out = clean_text("Read this https://example.com/a?b=c and www.site.org now");
        assert_eq!(out, "Read this and now");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(clean_text("Finals week :( #help"), "Finals week help");
        assert_eq!(clean_text("Is it worth it?! Yes, maybe."), "Is it worth it?! Yes, maybe.");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  too   many\n\tspaces  "), "too many spaces");
    }

    #[test]
    fn empty_input() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("   "), "");
    }

    #[test]
    fn mangled_url_is_still_removed() {
        let out = clean_text("see h@ttp://evil.example/x and w@ww.other.example");
        assert!(!out.contains("http"));
        assert!(!out.contains("www."));
        assert_eq!(out, "see and");
    }

    #[test]
    fn output_invariants_hold() {
        let inputs = [
            "I need a ROOMMATE!!! (urgent) -- http://x.co/y",
            "rent: $1,200/mo @ https://apt.example",
            "tabs\t\tand\r\nnewlines  ",
            "café & résumé",
            "emoji 🎓 grad",
            "[deleted] ~~~ www.reddit.com/r/college",
        ];
        for input in inputs {
            let out = clean_text(input);
            assert!(!out.contains("http://"), "{out:?}");
            assert!(!out.contains("https://"), "{out:?}");
            assert!(!out.contains("www."), "{out:?}");
            assert!(!out.contains("  "), "{out:?}");
            assert_eq!(out, out.trim());
            if input.is_ascii() {
                assert!(out.chars().all(allowed), "{out:?}");
            }
        }
    }

    #[test]
    fn keyword_match_ignores_case() {
        assert!(contains_any_keyword("I need a ROOMMATE", &["roommate"]));
        assert!(!contains_any_keyword("exam stress", &["roommate", "lease"]));
    }

    #[test]
    fn keyword_match_is_substring() {
        assert!(contains_any_keyword("Subletting my place", &["sublet"]));
        assert!(contains_any_keyword("Off-Campus housing?", &["off-campus"]));
    }

    #[test]
    fn no_keywords_never_match() {
        let none: [&str; 0] = [];
        assert!(!contains_any_keyword("anything", &none));
        assert!(!KeywordSet::new(none).matches("anything"));
    }

    #[test]
    fn keyword_set_folds_and_drops_blanks() {
        let set = KeywordSet::new(["  Lease ", "", "DORM"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["lease", "dorm"]);
        assert!(set.matches("Breaking my lease early"));
        assert!(set.matches("dorm food"));
        assert!(!set.matches("calculus"));
    }
}
