//! Declaration Visitor
//!
//! Dispatches every declaration whose property is in the overflow family
//! to the shared fallback handler, walking blocks in document order.

use std::collections::HashMap;

use serde_json::Value;

use crate::declaration::DeclarationList;
use crate::inserter::FallbackInserter;
use crate::options::{ConfigError, FallbackOptions};
use crate::properties::OverflowProperty;
use crate::Stylesheet;

/// Handler invoked for one declaration; returns how many declarations it
/// inserted in front of it
pub type DeclarationHandler = fn(&FallbackInserter, &mut DeclarationList, usize) -> usize;

/// Counters for one transform run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Rules walked
    pub rules: usize,
    /// Declarations handed to a handler
    pub visited: usize,
    /// Fallback declarations inserted
    pub inserted: usize,
}

/// The overflow fallback transform
#[derive(Debug, Clone)]
pub struct OverflowFallbacks {
    inserter: FallbackInserter,
    handlers: HashMap<&'static str, DeclarationHandler>,
}

impl OverflowFallbacks {
    pub const NAME: &'static str = "overflow-fallback";

    pub fn new(options: FallbackOptions) -> Self {
        let handlers = OverflowProperty::ALL
            .iter()
            .map(|property| (property.name(), handle_declaration as DeclarationHandler))
            .collect();

        Self {
            inserter: FallbackInserter::new(options),
            handlers,
        }
    }

    /// Build from a JSON options object, rejecting removed options
    pub fn from_json_value(options: Value) -> Result<Self, ConfigError> {
        Ok(Self::new(FallbackOptions::from_json_value(options)?))
    }

    pub fn from_json_str(options: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(FallbackOptions::from_json_str(options)?))
    }

    pub fn options(&self) -> &FallbackOptions {
        self.inserter.options()
    }

    /// Handler registered for `property`, if any
    pub fn handler(&self, property: &str) -> Option<DeclarationHandler> {
        self.handlers.get(property).copied()
    }

    /// Walk one declaration list left to right. Declarations inserted for an
    /// earlier declaration are already in place when later ones are handled.
    pub fn visit_declarations(&self, list: &mut DeclarationList) -> TransformStats {
        let mut stats = TransformStats::default();
        let mut index = 0;

        while index < list.len() {
            if let Some(handler) = self.handler(&list[index].property) {
                let inserted = handler(&self.inserter, list, index);
                stats.visited += 1;
                stats.inserted += inserted;
                index += inserted;
            }
            index += 1;
        }

        stats
    }

    /// Apply the transform to every rule of a stylesheet
    pub fn transform(&self, stylesheet: &mut Stylesheet) -> TransformStats {
        let mut stats = TransformStats::default();

        for rule in stylesheet.rules_mut() {
            let rule_stats = self.visit_declarations(&mut rule.declarations);
            stats.rules += 1;
            stats.visited += rule_stats.visited;
            stats.inserted += rule_stats.inserted;
        }

        tracing::debug!(
            rules = stats.rules,
            visited = stats.visited,
            inserted = stats.inserted,
            "{} finished",
            Self::NAME
        );
        stats
    }
}

impl Default for OverflowFallbacks {
    fn default() -> Self {
        Self::new(FallbackOptions::default())
    }
}

fn handle_declaration(inserter: &FallbackInserter, list: &mut DeclarationList, index: usize) -> usize {
    inserter.process(list, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;

    fn list(decls: &[(&str, &str)]) -> DeclarationList {
        decls.iter().map(|(p, v)| Declaration::new(*p, *v)).collect()
    }

    #[test]
    fn test_dispatch_table() {
        let transform = OverflowFallbacks::default();
        for name in ["overflow", "overflow-x", "overflow-y", "overflow-block", "overflow-inline"] {
            assert!(transform.handler(name).is_some(), "{name} not registered");
        }
        assert!(transform.handler("overflow-wrap").is_none());
        assert!(transform.handler("display").is_none());
    }

    #[test]
    fn test_visit_counts() {
        let transform = OverflowFallbacks::default();
        let mut decls = list(&[
            ("color", "red"),
            ("overflow", "clip"),
            ("overflow", "something"),
            ("overflow", "clip"),
        ]);

        let stats = transform.visit_declarations(&mut decls);

        assert_eq!(stats.visited, 3);
        assert_eq!(stats.inserted, 1);
        assert_eq!(
            decls.to_css(),
            "color: red; overflow: hidden; overflow: clip; overflow: something; overflow: clip;"
        );
    }

    #[test]
    fn test_second_pass_is_noop() {
        let transform = OverflowFallbacks::default();
        let mut decls = list(&[("overflow", "clip overlay"), ("overflow-y", "overlay")]);

        assert_eq!(transform.visit_declarations(&mut decls).inserted, 3);
        let once = decls.clone();
        assert_eq!(transform.visit_declarations(&mut decls).inserted, 0);
        assert_eq!(decls, once);
    }

    #[test]
    fn test_removed_options_fail_construction() {
        let err = OverflowFallbacks::from_json_str(r#"{ "upgradeHiddenToClip": false }"#).unwrap_err();
        assert!(matches!(err, ConfigError::RemovedOptions));
    }
}
