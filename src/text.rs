// Text cleanup applied to article text before it reaches the engine.
//
// News search APIs return titles and snippets with <b>highlight</b> tags and
// HTML entities. The engine itself does no normalization, so importers run
// text through `clean_markup` on the way into the store.

use std::sync::OnceLock;

use regex_lite::Regex;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

fn space_pattern() -> &'static Regex {
    static SPACES: OnceLock<Regex> = OnceLock::new();
    SPACES.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Entities stripped outright (quotes and angle brackets carry no content
/// for scoring) or replaced with their plain-text equivalent.
const ENTITIES: &[(&str, &str)] = &[
    ("&quot;", ""),
    ("&gt;", ""),
    ("&lt;", ""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    ("&amp;", "&"),
];

/// Remove HTML tags and common entities, then collapse whitespace.
pub fn clean_markup(text: &str) -> String {
    let mut out = tag_pattern().replace_all(text, "").into_owned();
    for &(entity, replacement) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }
    space_pattern().replace_all(out.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_highlight_tags() {
        assert_eq!(clean_markup("<b>Senate</b> passes bill"), "Senate passes bill");
    }

    #[test]
    fn strips_quote_entities() {
        assert_eq!(clean_markup("&quot;Reform&quot; stalls"), "Reform stalls");
    }

    #[test]
    fn decodes_ampersand_last() {
        // "&amp;quot;" is a literal "&quot;" in the source, not a quote mark
        assert_eq!(clean_markup("R&amp;D &amp;quot;"), "R&D &quot;");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_markup("  a \n\t b  "), "a b");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(clean_markup("nothing to do"), "nothing to do");
    }
}
