//! Declaration Lists
//!
//! Ordered declarations of a single block. Sibling navigation is positional
//! (an index into the list), so inserting mid-traversal never leaves a
//! dangling reference behind.

use std::fmt::Write;

/// CSS declaration (property: value)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    pub important: bool,
    /// Whitespace that preceded the declaration in the source
    pub(crate) before: String,
    /// Source text between the property name and the value, usually `": "`
    pub(crate) between: String,
    /// Byte offset of the property name in the parsed source. `None` for
    /// declarations that were inserted rather than parsed.
    pub(crate) offset: Option<usize>,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
            before: String::new(),
            between: String::from(": "),
            offset: None,
        }
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Text spliced into the source in front of the declaration that
    /// follows this one.
    pub(crate) fn to_source_text(&self) -> String {
        let mut out = String::with_capacity(self.property.len() + self.value.len() + 4);
        out.push_str(&self.property);
        out.push_str(&self.between);
        out.push_str(&self.value);
        if self.important {
            out.push_str(" !important");
        }
        out.push(';');
        out.push_str(&self.before);
        out
    }
}

/// Ordered list of sibling declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationList {
    declarations: Vec<Declaration>,
}

impl DeclarationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, declaration: Declaration) {
        self.declarations.push(declaration);
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Declaration> {
        self.declarations.get(index)
    }

    /// Declaration immediately before `index`
    pub fn prev(&self, index: usize) -> Option<&Declaration> {
        index.checked_sub(1).and_then(|i| self.declarations.get(i))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }

    /// Insert a new declaration with `value` directly before `index`.
    ///
    /// The new declaration copies the property and source formatting of the
    /// reference declaration, minus any comments around the colon, but never
    /// its `!important` flag. Returns the
    /// index of the inserted declaration; the reference moves to `index + 1`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn insert_before(&mut self, index: usize, value: impl Into<String>) -> usize {
        let reference = &self.declarations[index];
        let inserted = Declaration {
            property: reference.property.clone(),
            value: value.into(),
            important: false,
            before: reference.before.clone(),
            between: plain_between(&reference.between),
            offset: None,
        };
        self.declarations.insert(index, inserted);
        index
    }

    /// Canonical `prop: value;` rendering joined by single spaces
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, decl) in self.declarations.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}: {}", decl.property, decl.value);
            if decl.important {
                out.push_str(" !important");
            }
            out.push(';');
        }
        out
    }
}

/// The colon of a property/value separator with the whitespace directly
/// around it. Comments and anything beyond them are dropped.
fn plain_between(between: &str) -> String {
    let Some(colon) = find_colon(between) else {
        return String::from(": ");
    };
    let (head, tail) = (&between[..colon], &between[colon + 1..]);
    let leading = if head.chars().all(char::is_whitespace) { head } else { "" };
    let trailing = &tail[..tail.len() - tail.trim_start().len()];
    format!("{leading}:{trailing}")
}

/// Byte index of the first `:` outside a comment
fn find_colon(text: &str) -> Option<usize> {
    let mut rest = 0;
    while let Some(found) = text[rest..].find([':', '/']) {
        let index = rest + found;
        if text[index..].starts_with(':') {
            return Some(index);
        }
        rest = match text[index..].strip_prefix("/*") {
            Some(comment) => match comment.find("*/") {
                Some(end) => index + 2 + end + 2,
                None => return None,
            },
            None => index + 1,
        };
    }
    None
}

impl<'a> IntoIterator for &'a DeclarationList {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

impl FromIterator<Declaration> for DeclarationList {
    fn from_iter<I: IntoIterator<Item = Declaration>>(iter: I) -> Self {
        Self {
            declarations: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<usize> for DeclarationList {
    type Output = Declaration;

    fn index(&self, index: usize) -> &Declaration {
        &self.declarations[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> DeclarationList {
        [
            Declaration::new("color", "red"),
            Declaration::new("overflow", "clip").important(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_sibling_navigation() {
        let list = list();
        assert!(list.prev(0).is_none());
        assert_eq!(list.prev(1).map(|d| d.property.as_str()), Some("color"));
    }

    #[test]
    fn test_insert_before_drops_important() {
        let mut list = list();
        let index = list.insert_before(1, "hidden");

        assert_eq!(index, 1);
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].property, "overflow");
        assert!(!list[1].important);
        assert!(list[1].offset.is_none());
        assert!(list[2].important);
        assert_eq!(list.to_css(), "color: red; overflow: hidden; overflow: clip !important;");
    }

    #[test]
    fn test_source_text_uses_copied_raws() {
        let mut decl = Declaration::new("overflow", "clip");
        decl.before = String::from("\n  ");
        decl.between = String::from(":");
        let mut list: DeclarationList = std::iter::once(decl).collect();
        list.insert_before(0, "hidden");
        assert_eq!(list[0].to_source_text(), "overflow:hidden;\n  ");
    }

    #[test]
    fn test_plain_between_drops_comments() {
        assert_eq!(plain_between(": "), ": ");
        assert_eq!(plain_between(" :\t"), " :\t");
        assert_eq!(plain_between(":"), ":");
        assert_eq!(plain_between(": /*c*/ "), ": ");
        assert_eq!(plain_between("/* a: b */ :  "), ":  ");
        assert_eq!(plain_between(":/*c*/"), ":");
    }
}
