//! Line-oriented markdown block parser.
//!
//! Articles are written in a small markdown subset. There is no AST: input is
//! split into lines and each line is classified on its own, with a tiny amount
//! of state carried between lines.
//!
//! ## Block Syntax
//!
//! | Line (after trimming) | Output |
//! |-----------------------|--------|
//! | ```` ```lang ```` | opens/closes `<pre><code class="language-lang">` |
//! | `> text` | `<blockquote>text</blockquote>` |
//! | `# text` | `<h1>text</h1>` |
//! | `## text` | `<h2 id="a"><a href="#a">text</a></h2>` |
//! | `### text` | `<h3>text</h3>` |
//! | `- text` | `<li>text</li>` inside a `<ul>` |
//! | blank | ends an open list |
//! | anything else | `<p>text</p>` |
//!
//! ## State
//!
//! Only two things survive from one line to the next: whether a `<ul>` is
//! open, and whether we are inside a fenced code block (with its language).
//! Block quotes are single-line and stateless. Inside a code fence every line,
//! blank ones included, is emitted escaped and verbatim until the next fence.
//!
//! ## Title and Excerpt
//!
//! If the very first line is a `# ` heading its text becomes the post title.
//! That line is still rendered as an `<h1>` like any other heading.
//!
//! The excerpt is the inline HTML of the first plain paragraph in the
//! document. Later paragraphs never replace it.
//!
//! ## Leniency
//!
//! Parsing never fails. Unknown syntax falls through to a paragraph, and
//! anything still open at end of input (list or code fence) is closed so the
//! output is always balanced.

use crate::anchor;
use crate::inline::{self, escape_html};

/// Result of parsing one article.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMarkdown {
    /// Rendered block HTML for the whole article.
    pub content_html: String,
    /// Text of a leading `# ` heading, or empty.
    pub title: String,
    /// Inline HTML of the first plain paragraph, or empty.
    pub excerpt: String,
}

/// Classification of a single trimmed line.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Fence(&'a str),
    Quote(&'a str),
    Heading(u8, &'a str),
    ListItem(&'a str),
    Blank,
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(lang) = line.strip_prefix("```") {
        Line::Fence(lang.trim())
    } else if let Some(rest) = line.strip_prefix("> ") {
        Line::Quote(rest)
    } else if let Some(rest) = line.strip_prefix("# ") {
        Line::Heading(1, rest)
    } else if let Some(rest) = line.strip_prefix("## ") {
        Line::Heading(2, rest)
    } else if let Some(rest) = line.strip_prefix("### ") {
        Line::Heading(3, rest)
    } else if let Some(rest) = line.strip_prefix("- ") {
        Line::ListItem(rest)
    } else if line.is_empty() {
        Line::Blank
    } else {
        Line::Text(line)
    }
}

#[derive(Default)]
struct BlockParser {
    out: String,
    in_list: bool,
    /// `Some(lang)` while inside a fenced code block.
    code_lang: Option<String>,
    excerpt: Option<String>,
}

impl BlockParser {
    fn close_list(&mut self) {
        if self.in_list {
            self.out.push_str("</ul>\n");
            self.in_list = false;
        }
    }

    fn open_code(&mut self, lang: &str) {
        if lang.is_empty() {
            self.out.push_str("<pre><code>");
        } else {
            self.out.push_str("<pre><code class=\"language-");
            self.out.push_str(&escape_html(lang));
            self.out.push_str("\">");
        }
        self.code_lang = Some(lang.to_string());
    }

    fn close_code(&mut self) {
        self.out.push_str("</code></pre>\n");
        self.code_lang = None;
    }

    fn line(&mut self, raw: &str) {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let line = classify(raw.trim());

        if self.code_lang.is_some() {
            if let Line::Fence(_) = line {
                self.close_code();
            } else {
                self.out.push_str(&escape_html(raw));
                self.out.push('\n');
            }
            return;
        }

        match line {
            Line::Fence(lang) => {
                // A <pre> never opens inside a <ul>: the list ends here and a
                // list item after the fence starts a new list.
                self.close_list();
                self.open_code(lang);
            }
            Line::Quote(text) => {
                self.close_list();
                self.out.push_str("<blockquote>");
                self.out.push_str(&inline::format(text));
                self.out.push_str("</blockquote>\n");
            }
            Line::Heading(2, text) => {
                self.close_list();
                let id = anchor::sanitize(text);
                self.out.push_str(&format!(
                    "<h2 id=\"{id}\"><a href=\"#{id}\">{}</a></h2>\n",
                    inline::format(text)
                ));
            }
            Line::Heading(level, text) => {
                self.close_list();
                self.out.push_str(&format!(
                    "<h{level}>{}</h{level}>\n",
                    inline::format(text)
                ));
            }
            Line::ListItem(text) => {
                if !self.in_list {
                    self.out.push_str("<ul>\n");
                    self.in_list = true;
                }
                self.out.push_str("<li>");
                self.out.push_str(&inline::format(text));
                self.out.push_str("</li>\n");
            }
            Line::Blank => self.close_list(),
            Line::Text(text) => {
                self.close_list();
                let html = inline::format(text);
                self.out.push_str("<p>");
                self.out.push_str(&html);
                self.out.push_str("</p>\n");
                if self.excerpt.is_none() {
                    self.excerpt = Some(html);
                }
            }
        }
    }

    fn finish(mut self) -> (String, String) {
        self.close_list();
        if self.code_lang.is_some() {
            self.close_code();
        }
        (self.out, self.excerpt.unwrap_or_default())
    }
}

/// Extract the title from the first line, if it is a level-1 heading.
fn extract_title(input: &str) -> String {
    let first = input.split('\n').next().unwrap_or_default();
    let first = first.strip_suffix('\r').unwrap_or(first);
    first
        .strip_prefix("# ")
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Parse a whole article into block HTML, title and excerpt.
pub fn parse(input: &str) -> ParsedMarkdown {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let title = extract_title(input);

    let mut parser = BlockParser::default();
    for raw in input.split('\n') {
        parser.line(raw);
    }
    let (content_html, excerpt) = parser.finish();

    ParsedMarkdown {
        content_html,
        title,
        excerpt,
    }
}
