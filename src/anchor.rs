//! In-page anchor ids for level-2 headings.
//!
//! The mapping is character-for-character: letters, digits and the URL
//! unreserved punctuation `-`, `_`, `.`, `~` are kept, everything else
//! (whitespace included) becomes a single `-`, and the result is lower-cased.
//! Runs of dashes are not collapsed and leading/trailing dashes are not
//! trimmed, so `Hello, World!` becomes `hello--world-`.
//!
//! Two headings that differ only in punctuation map to the same id. Callers
//! must tolerate duplicate anchors.

/// Derive an anchor id from raw heading text.
pub fn sanitize(heading: &str) -> String {
    let kept: String = heading
        .chars()
        .map(|c| match c {
            c if c.is_alphabetic() || c.is_numeric() => c,
            '-' | '_' | '.' | '~' => c,
            _ => '-',
        })
        .collect();
    kept.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_and_spaces_become_dashes() {
        assert_eq!(sanitize("Hello, World!"), "hello--world-");
    }

    #[test]
    fn unreserved_punctuation_is_kept() {
        assert_eq!(sanitize("v1.2_beta~rc-1"), "v1.2_beta~rc-1");
    }

    #[test]
    fn dashes_are_not_collapsed_or_trimmed() {
        assert_eq!(sanitize("  a  "), "--a--");
    }

    #[test]
    fn non_ascii_letters_are_kept_and_lowered() {
        assert_eq!(sanitize("Über Straße"), "über-straße");
    }

    #[test]
    fn markup_characters_are_replaced() {
        assert_eq!(sanitize("<b>\"x\"</b>"), "-b--x---b-");
    }

    #[test]
    fn empty_heading() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn punctuation_only_variants_collide() {
        assert_eq!(sanitize("Why?"), sanitize("Why!"));
    }
}
