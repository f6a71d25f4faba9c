//! Overflow Fallbacks
//!
//! Inserts backward-compatible fallback declarations in front of the
//! `overflow` keywords `clip` and `overlay`, which some engines do not
//! understand:
//!
//! ```css
//! a { overflow: clip; }          /* input */
//! a { overflow: hidden; overflow: clip; }
//! ```
//!
//! # Example
//! ```rust
//! use overflow_fallback::{parse_stylesheet, OverflowFallbacks};
//!
//! let mut stylesheet = parse_stylesheet("a{ overflow-x: overlay; }").unwrap();
//! OverflowFallbacks::default().transform(&mut stylesheet);
//! assert_eq!(stylesheet.to_css(), "a{ overflow-x: auto; overflow-x: overlay; }");
//! ```

mod declaration;
mod inserter;
mod options;
mod parser;
pub mod properties;
pub mod value;
mod visitor;

pub use declaration::{Declaration, DeclarationList};
pub use inserter::FallbackInserter;
pub use options::{ConfigError, FallbackOptions, REMOVED_OPTIONS};
pub use parser::CssParser;
pub use visitor::{DeclarationHandler, OverflowFallbacks, TransformStats};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parse `css`, insert fallbacks and serialize the result
pub fn transform_css(css: &str, options: FallbackOptions) -> Result<String, CssError> {
    let mut stylesheet = parse_stylesheet(css)?;
    OverflowFallbacks::new(options).transform(&mut stylesheet);
    Ok(stylesheet.to_css())
}

/// Parsed stylesheet
#[derive(Debug, Default)]
pub struct Stylesheet {
    source: String,
    rules: Vec<Rule>,
}

/// A block of declarations and the prelude that introduced it
#[derive(Debug)]
pub struct Rule {
    /// Selector or at-rule prelude, trimmed
    pub selector: String,
    pub declarations: DeclarationList,
    /// Byte offset where the block contents end
    block_end: usize,
}

impl Rule {
    pub(crate) fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declarations: DeclarationList::new(),
            block_end: 0,
        }
    }
}

impl Stylesheet {
    pub(crate) fn from_parts(source: String, rules: Vec<Rule>) -> Self {
        Self { source, rules }
    }

    /// Rules in document order; nested rules follow their parent
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut [Rule] {
        &mut self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total number of declarations across all rules
    pub fn declaration_count(&self) -> usize {
        self.rules.iter().map(|r| r.declarations.len()).sum()
    }

    /// Serialize back to CSS.
    ///
    /// The original source is reproduced byte for byte. Inserted declarations
    /// are written directly in front of the parsed declaration that follows
    /// them, reusing its formatting.
    pub fn to_css(&self) -> String {
        let mut splices: Vec<(usize, String)> = Vec::new();

        for rule in &self.rules {
            let mut pending = String::new();
            for decl in &rule.declarations {
                match decl.offset {
                    None => pending.push_str(&decl.to_source_text()),
                    Some(offset) if !pending.is_empty() => {
                        splices.push((offset, std::mem::take(&mut pending)));
                    }
                    Some(_) => {}
                }
            }
            if !pending.is_empty() {
                splices.push((rule.block_end, pending));
            }
        }

        splices.sort_by_key(|(offset, _)| *offset);

        let extra: usize = splices.iter().map(|(_, text)| text.len()).sum();
        let mut out = String::with_capacity(self.source.len() + extra);
        let mut cursor = 0;
        for (offset, text) in splices {
            out.push_str(&self.source[cursor..offset]);
            out.push_str(&text);
            cursor = offset;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
