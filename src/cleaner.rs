//! Markup cleaning pipeline
//!
//! Converts raw wiki markup into flowing text fit for language-model
//! consumption. The pipeline is a fixed, order-dependent sequence of
//! text-to-text stages; each stage's output is the next stage's input and
//! reordering them changes correctness (section-tag derivation must run
//! after non-nested markup removal because headings can carry inline
//! styling tags).
//!
//! This is a best-effort distillation, not a rendering engine: malformed
//! markup never fails the pipeline, it degrades into literal text that the
//! finalize stage sweeps up.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Trailing sections that carry no prose worth indexing
const STOP_SECTIONS: &str = "See also|Notes|References|Further reading|External links";

/// Delimiter pairs tracked by the nested-removal state machine. `<!`/`!>`
/// are private placeholders standing in for the table delimiters `{|`/`|}`
/// after tokenization.
const BRACKET_PAIRS: [(&str, &str); 3] = [("{{", "}}"), ("[[", "]]"), ("<!", "!>")];

static STOP_READING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"={{2,}}\s?({STOP_SECTIONS})")).expect("stop-section pattern")
});

static LINKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\[.*?\]\]").expect("link pattern"));

/// Simple constructs removable in one alternation pass: they either carry
/// no prose or are self-contained with an unambiguous close tag.
static REMOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = [
        r"<!--.*?-->",                  // comments
        r"</?nowiki>",
        r"<ref[^(/>)]*>.*?</ref>",      // references and citations
        r"<ref.*?/>",
        r"</?span[^>]*>",               // html and wikitext font styling
        r"<br\s*/?>",
        r"</?div[^>]*>",
        r"</?su(p|b)>",
        r"</?u>",
        r"'{2,}",
        r"</?blockquote>",
        r"&nbsp;",
        r"</?small>",
        r"<gallery[^>]*>.*?</gallery>", // collections of images
        r"<imagemap.*?</imagemap>",
        r"<math>.*?</math>",            // equations and code blocks
        r"<code.*?</code>",
    ];
    Regex::new(&format!("(?s)({})", alternatives.join("|"))).expect("remove pattern")
});

/// One or more `== Heading ==` lines, optionally followed by a
/// `{{Main|...}}` / `{{Further|...}}` cross-reference template.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:={2,}.*?={2,}\s?\n+)+(?:\{\{(?:Main|Further)\|.*?\}\})?")
        .expect("section pattern")
});

static LEXER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\{\{|\}\}|\[\[|\]\]|<!|!>)").expect("lexer pattern")
});

static FINAL_ARTIFACTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\{\{|\}\}|\||\t{2,}|\(\s*\)|\(\s*;\s*\)|\s*;\s*)")
        .expect("artifact pattern")
});

static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("space pattern"));

static MULTI_NEWLINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern"));

/// Fixed pipeline of markup-to-text transformations
///
/// Stateless handle over compile-once patterns; cheap to clone and share
/// across worker threads. [`clean`](MarkupCleaner::clean) is a pure total
/// function, it never fails on malformed markup.
///
/// # Example
///
/// ```
/// use wikidump_rs::MarkupCleaner;
///
/// let cleaner = MarkupCleaner::new();
/// let text = cleaner.clean("'''Albert Einstein''' was a [[Germany|German]] physicist.");
/// assert!(text.starts_with("##tags:"));
/// assert!(text.ends_with("Albert Einstein was a German physicist."));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupCleaner;

impl MarkupCleaner {
    /// Create a cleaner
    pub fn new() -> Self {
        Self
    }

    /// Run the full pipeline over one article's raw markup
    pub fn clean(&self, text: &str) -> String {
        let text = self.remove_references_section(text);
        let text = self.cleanup_links(text);
        let text = self.remove_non_nested_elements(&text);
        // section headings can contain html and other styling, so tag
        // derivation must run after the removal pass
        let text = self.generate_section_tags(&text);
        let text = self.tokenize(&text);
        let text = self.remove_nested_elements(&text);
        self.finalize(&text)
    }

    /// Stage 1: discard everything from the first trailing stop section
    /// (`See also`, `Notes`, `References`, ...) to the end
    pub fn remove_references_section<'a>(&self, text: &'a str) -> &'a str {
        match STOP_READING_RE.find(text) {
            Some(m) => &text[..m.start()],
            None => text,
        }
    }

    /// Stage 2: resolve inline links to their display text
    ///
    /// `[[Target]]` becomes `Target`, `[[Target|Display]]` becomes
    /// `Display`. `File:`/`Image:` links are left untouched for the
    /// nested-removal stage to delete whole.
    ///
    /// ```
    /// use wikidump_rs::MarkupCleaner;
    ///
    /// let cleaner = MarkupCleaner::new();
    /// assert_eq!(
    ///     cleaner.cleanup_links("[[Albert Einstein|Einstein]] was born"),
    ///     "Einstein was born"
    /// );
    /// assert_eq!(cleaner.cleanup_links("[[Relativity]]"), "Relativity");
    /// ```
    pub fn cleanup_links(&self, text: &str) -> String {
        LINKS_RE
            .replace_all(text, |caps: &Captures| {
                let m = &caps[0];
                let inner = &m[2..m.len() - 2];
                if inner.starts_with("File:") || inner.starts_with("Image:") {
                    return m.to_string();
                }
                match inner.find('|') {
                    Some(j) => inner[j + 1..].to_string(),
                    None => inner.to_string(),
                }
            })
            .into_owned()
    }

    /// Stage 3: delete simple non-nested constructs in one alternation pass
    pub fn remove_non_nested_elements(&self, text: &str) -> String {
        REMOVE_RE.replace_all(text, "").into_owned()
    }

    /// Stage 4: collapse section structure into flat `##tags:` lines
    pub fn generate_section_tags(&self, text: &str) -> String {
        let text = self.make_intro_section(text);
        SECTION_RE.replace_all(&text, make_section_tags).into_owned()
    }

    /// Tag the lead section from its short-description template, if any
    fn make_intro_section(&self, text: &str) -> String {
        const SHORT_DESC: &str = "{{Short description|";

        let mut out = String::from("##tags:");
        let mut rest = text;
        if text.starts_with(SHORT_DESC) {
            if let Some(end) = text.find("}}") {
                for word in text[SHORT_DESC.len()..end].replace('|', " ").split_whitespace() {
                    out.push(' ');
                    out.push_str(word);
                }
                rest = &text[end + 2..];
            }
        }
        out.push_str(" \n\n");
        out.push_str(rest);
        out
    }

    /// Stage 5: pad remaining delimiter tokens with spaces so the nested
    /// removal can split on whitespace and match whole tokens
    ///
    /// Escapes `|}}` first so a template close is not mistaken for the
    /// table-close placeholder, then swaps `{|`/`|}` for the private
    /// `<!`/`!>` pair.
    pub fn tokenize(&self, text: &str) -> String {
        let text = text.replace("|}}", "| }}").replace("{|", "<!").replace("|}", "!>");
        LEXER_RE.replace_all(&text, " ${1} ").into_owned()
    }

    /// Stage 6: depth-tracked deletion of nested constructs
    ///
    /// Walks line by line over whitespace-separated tokens with a single
    /// depth counter and one remembered active delimiter pair. While a
    /// region is open only tokens equal to the active pair's own opener or
    /// closer change the depth; delimiters of other families are ignored
    /// until depth returns to zero. One family at a time is deliberate,
    /// not a missing stack: in practice nested markup uses a single
    /// delimiter family per block, and downstream tag extraction is tuned
    /// against this exact behavior.
    pub fn remove_nested_elements(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut depth: u32 = 0;
        let mut active: Option<(&str, &str)> = None;

        for line in text.split('\n') {
            let mut first = true;
            for token in line.split_whitespace() {
                match active {
                    Some((open, close)) => {
                        if token == open {
                            depth += 1;
                        } else if token == close {
                            depth -= 1;
                        }
                        if depth == 0 {
                            active = None;
                        }
                    }
                    None => {
                        if let Some(pair) =
                            BRACKET_PAIRS.iter().find(|(open, _)| *open == token)
                        {
                            active = Some(*pair);
                            depth = 1;
                        } else {
                            if !first {
                                out.push(' ');
                            }
                            out.push_str(token);
                            first = false;
                        }
                    }
                }
            }
            // keep original line spacing
            if !first {
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    /// Stage 7: sweep up leftover delimiter tokens and punctuation
    /// artifacts, normalize whitespace, trim
    pub fn finalize(&self, text: &str) -> String {
        let text = FINAL_ARTIFACTS_RE.replace_all(text, " ");
        let text = MULTI_SPACE_RE.replace_all(&text, " ");
        let text = MULTI_NEWLINE_RE.replace_all(&text, "\n\n");
        text.trim().to_string()
    }
}

/// Rewrite one heading-plus-template match as a `##tags:` line: heading
/// words and cross-reference link words, lowercased, with `=`, newlines,
/// commas, and apostrophes stripped
fn make_section_tags(caps: &Captures) -> String {
    let mut text = caps[0].to_string();
    if let Some(i) = text.find("{{") {
        if text.ends_with("}}") {
            if let Some(j) = text[i..].find('|').map(|j| i + j) {
                let tail = text.len() - 2;
                text = format!("{}{}", &text[..i], &text[j + 1..tail]);
            }
        }
    }
    let text = text
        .replace('=', "")
        .replace('\n', " ")
        .replace(',', "")
        .replace('\'', "")
        .to_lowercase();
    format!("##tags: {text} \n\n")
}
