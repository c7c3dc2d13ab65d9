//! Inline span formatting.
//!
//! Converts the text of a single markdown line into an HTML fragment. The
//! supported spans are deliberately few:
//!
//! | Markdown | HTML |
//! |----------|------|
//! | `![alt](url)` | `<figure><img src="url" alt="alt"><figcaption>alt</figcaption></figure>` |
//! | `[text](url)` | `<a href="url">text</a>` |
//! | `` `code` `` | `<code>code</code>` |
//! | `**bold**` | `<strong>bold</strong>` |
//! | `~~gone~~` | `<del>gone</del>` |
//! | `*em*` | `<em>em</em>` |
//!
//! ## Pass Order
//!
//! The line is HTML-escaped first, then each substitution runs once over the
//! output of the previous one, in the table order above. Images must run
//! before links (an image is a link with a leading `!`), and bold must run
//! before italic so `**x**` is never read as two empty emphasis markers.
//!
//! There is no nesting resolution beyond that fixed order. Overlapping markers
//! produce whatever the single pass yields, e.g. `*a **b* c**` renders as
//! `<em>a <strong>b</em> c</strong>`.

use regex::Regex;
use std::sync::LazyLock;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("image pattern"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("link pattern"));
static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("code pattern"));
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));
static STRIKE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~~(.+?)~~").expect("strikethrough pattern"));
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern"));

/// Escape the five HTML-significant characters.
///
/// Quotes use numeric references so the result is safe inside both
/// double- and single-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one line of markdown inline spans as an HTML fragment.
///
/// Never fails: unmatched markers are left in place as (escaped) text.
pub fn format(raw: &str) -> String {
    let text = escape_html(raw);
    let text = IMAGE_RE.replace_all(
        &text,
        r#"<figure><img src="${2}" alt="${1}"><figcaption>${1}</figcaption></figure>"#,
    );
    let text = LINK_RE.replace_all(&text, r#"<a href="${2}">${1}</a>"#);
    let text = CODE_RE.replace_all(&text, "<code>${1}</code>");
    let text = BOLD_RE.replace_all(&text, "<strong>${1}</strong>");
    let text = STRIKE_RE.replace_all(&text, "<del>${1}</del>");
    let text = ITALIC_RE.replace_all(&text, "<em>${1}</em>");
    text.into_owned()
}
