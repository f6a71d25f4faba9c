//! Fallback Inserter
//!
//! Decides, for one overflow declaration, whether older engines need a
//! fallback in front of it and inserts it:
//! 1. Skip when an author already placed a same-property declaration right
//!    before it (any value counts)
//! 2. `overlay` / `clip` get a single `auto` / `hidden` fallback
//! 3. Two-keyword `overflow` values get staged fallbacks, one per keyword
//!    family, the clip pass first and the overlay pass on its output

use tracing::{debug, trace};

use crate::declaration::DeclarationList;
use crate::options::FallbackOptions;
use crate::properties::{OverflowKeyword, OverflowProperty};
use crate::value::ValueTokens;

/// Inserts fallback declarations in front of modern overflow keywords
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackInserter {
    options: FallbackOptions,
}

impl FallbackInserter {
    pub fn new(options: FallbackOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FallbackOptions {
        &self.options
    }

    /// Process the declaration at `index`.
    ///
    /// Returns how many declarations were inserted in front of it; the
    /// processed declaration itself ends up at `index + inserted`.
    pub fn process(&self, list: &mut DeclarationList, index: usize) -> usize {
        if self.options.is_noop() {
            return 0;
        }

        let Some(decl) = list.get(index) else {
            return 0;
        };

        if let Some(prev) = list.prev(index) {
            if prev.property == decl.property {
                trace!(property = %decl.property, "fallback already present");
                return 0;
            }
        }

        let shorthand = OverflowProperty::from_name(&decl.property).is_some_and(|p| p.is_shorthand());
        let value = decl.value.clone();

        if let Some(keyword @ (OverflowKeyword::Overlay | OverflowKeyword::Clip)) =
            OverflowKeyword::from_keyword(&value)
        {
            return self.insert_single(list, index, keyword);
        }

        if !self.options.operate_on_double_values || !shorthand {
            return 0;
        }

        let mut tokens = ValueTokens::parse(&value);
        if tokens.keyword_pair().is_none() {
            trace!(value = %value, "not a keyword pair");
            return 0;
        }

        self.insert_staged(list, index, &mut tokens)
    }

    /// Whether fallbacks for `keyword` are switched on
    fn enabled(&self, keyword: OverflowKeyword) -> bool {
        match keyword {
            OverflowKeyword::Overlay => self.options.add_overlay_fallback,
            OverflowKeyword::Clip => self.options.add_clip_fallback,
            OverflowKeyword::Hidden | OverflowKeyword::Auto => false,
        }
    }

    fn insert_single(&self, list: &mut DeclarationList, index: usize, keyword: OverflowKeyword) -> usize {
        let Some(fallback) = keyword.fallback().filter(|_| self.enabled(keyword)) else {
            return 0;
        };

        list.insert_before(index, fallback.as_str());
        debug!(property = %list[index].property, value = fallback.as_str(), "inserted fallback");
        1
    }

    /// Clip pass, then overlay pass over the already rewritten tokens.
    /// Each pass that changes something inserts its own declaration in
    /// front of the previous insertion.
    fn insert_staged(&self, list: &mut DeclarationList, index: usize, tokens: &mut ValueTokens) -> usize {
        let mut anchor = index;
        let mut inserted = 0;

        for from in [OverflowKeyword::Clip, OverflowKeyword::Overlay] {
            let Some(to) = from.fallback() else {
                continue;
            };
            if !self.enabled(from) || !tokens.replace_keyword(from, to) {
                continue;
            }
            let value = tokens.to_string();
            debug!(property = %list[anchor].property, value = %value, "inserted staged fallback");
            anchor = list.insert_before(anchor, value);
            inserted += 1;
        }

        inserted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;

    fn single(property: &str, value: &str) -> DeclarationList {
        std::iter::once(Declaration::new(property, value)).collect()
    }

    #[test]
    fn test_single_keywords() {
        let inserter = FallbackInserter::default();

        let mut list = single("overflow", "clip");
        assert_eq!(inserter.process(&mut list, 0), 1);
        assert_eq!(list.to_css(), "overflow: hidden; overflow: clip;");

        let mut list = single("overflow-x", "overlay");
        assert_eq!(inserter.process(&mut list, 0), 1);
        assert_eq!(list.to_css(), "overflow-x: auto; overflow-x: overlay;");
    }

    #[test]
    fn test_staged_double_value() {
        let inserter = FallbackInserter::default();
        let mut list = single("overflow", "clip overlay");
        assert_eq!(inserter.process(&mut list, 0), 2);
        assert_eq!(
            list.to_css(),
            "overflow: hidden auto; overflow: hidden overlay; overflow: clip overlay;"
        );
    }

    #[test]
    fn test_double_value_only_on_shorthand() {
        let inserter = FallbackInserter::default();
        let mut list = single("overflow-x", "hidden clip");
        assert_eq!(inserter.process(&mut list, 0), 0);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut list = single("overflow", "clip");
        assert_eq!(FallbackInserter::default().process(&mut list, 3), 0);
    }
}
