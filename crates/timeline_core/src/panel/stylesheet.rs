//! Derived CSS for item categories and eras.
//!
//! # Invariants
//! - Selectors are only built from valid CSS identifiers.
//! - Declarations only carry values accepted by `is_valid_color`.
//! - Rules are ordered by key, so equal input yields equal CSS text.

use crate::adapter::projection::era_class_name;
use crate::model::category::CategoryStyle;
use crate::model::era::Era;
use crate::store::{Listeners, SubscriptionId};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt::Write;

static CSS_IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").expect("valid css ident regex"));
static COLOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|[a-zA-Z]+|rgba?\([0-9.,%\s]+\))$")
        .expect("valid colour regex")
});

/// Returns whether `value` can be used as a class selector.
pub fn is_valid_class_name(value: &str) -> bool {
    CSS_IDENT_RE.is_match(value)
}

/// Accepts hex, named and `rgb()/rgba()` colours.
pub fn is_valid_color(value: &str) -> bool {
    COLOR_RE.is_match(value.trim())
}

/// One `selector { property: value; }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    pub selector: String,
    pub declarations: Vec<(&'static str, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// One rule per category `className`.
    pub fn for_categories(categories: &BTreeMap<String, CategoryStyle>) -> Self {
        let rules = categories
            .iter()
            .filter_map(|(class_name, style)| {
                build_rule(
                    class_name,
                    &[
                        ("color", &style.fg),
                        ("background-color", &style.bg),
                        ("border-color", &style.border),
                    ],
                )
            })
            .collect();
        Self { rules }
    }

    /// One background rule per era, keyed by `era-<uuid>`.
    pub fn for_eras(eras: &BTreeMap<String, Era>) -> Self {
        let rules = eras
            .iter()
            .filter_map(|(uuid, era)| {
                build_rule(&era_class_name(uuid), &[("background-color", &era.color)])
            })
            .collect();
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn css(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            let _ = writeln!(out, ".{} {{", rule.selector);
            for (property, value) in &rule.declarations {
                let _ = writeln!(out, "  {property}: {value};");
            }
            out.push_str("}\n");
        }
        out
    }
}

fn build_rule(class_name: &str, declarations: &[(&'static str, &String)]) -> Option<StyleRule> {
    if !is_valid_class_name(class_name) {
        warn!(
            "event=stylesheet_rule module=panel status=skip reason=invalid_class_name class_name={class_name}"
        );
        return None;
    }
    let declarations = declarations
        .iter()
        .filter(|(property, value)| {
            let valid = is_valid_color(value);
            if !valid {
                warn!(
                    "event=stylesheet_rule module=panel status=skip reason=invalid_color class_name={class_name} property={property}"
                );
            }
            valid
        })
        .map(|(property, value)| (*property, value.trim().to_string()))
        .collect();
    Some(StyleRule {
        selector: class_name.to_string(),
        declarations,
    })
}

/// Callback invoked with the new stylesheet.
pub type StylesheetListener = dyn FnMut(&Stylesheet);

/// Holds the current stylesheet and notifies on change.
#[derive(Debug, Default)]
pub struct StylesheetPublisher {
    current: Stylesheet,
    listeners: Listeners<StylesheetListener>,
}

impl StylesheetPublisher {
    pub fn current(&self) -> &Stylesheet {
        &self.current
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Stylesheet) + 'static,
    {
        self.listeners.insert(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }

    /// Replaces the stylesheet. Returns `true` and notifies when it changed.
    pub fn publish(&mut self, next: Stylesheet) -> bool {
        if next == self.current {
            return false;
        }
        self.current = next;
        for listener in self.listeners.iter_mut() {
            listener(&self.current);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_class_name, is_valid_color, Stylesheet, StylesheetPublisher};
    use crate::model::category::CategoryStyle;
    use crate::model::era::Era;
    use std::cell::Cell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[test]
    fn colour_validation_accepts_common_forms() {
        for value in ["#fff", "#a1b2c3", "#a1b2c3d4", "red", "rgb(1, 2, 3)", "rgba(1,2,3,0.5)"] {
            assert!(is_valid_color(value), "{value} should be accepted");
        }
        for value in ["", "#12", "red; } body {", "url(x)"] {
            assert!(!is_valid_color(value), "{value} should be rejected");
        }
    }

    #[test]
    fn class_name_validation_rejects_selectors() {
        assert!(is_valid_class_name("milestone"));
        assert!(is_valid_class_name("era-0b1c"));
        assert!(!is_valid_class_name("1abc"));
        assert!(!is_valid_class_name("a b"));
        assert!(!is_valid_class_name("a.b"));
    }

    #[test]
    fn category_css_has_three_declarations() {
        let mut categories = BTreeMap::new();
        categories.insert("release".to_string(), CategoryStyle::default());
        categories.insert("bad class".to_string(), CategoryStyle::default());

        let css = Stylesheet::for_categories(&categories).css();

        assert_eq!(
            css,
            ".release {\n  color: #1a1a1a;\n  background-color: #d5ddf6;\n  border-color: #97b0f8;\n}\n"
        );
    }

    #[test]
    fn era_css_uses_prefixed_selector() {
        let mut eras = BTreeMap::new();
        eras.insert("e1".to_string(), Era::new("Iron", 0, 1, "#334455"));
        let css = Stylesheet::for_eras(&eras).css();
        assert_eq!(css, ".era-e1 {\n  background-color: #334455;\n}\n");
    }

    #[test]
    fn publisher_notifies_only_on_change() {
        let calls = Rc::new(Cell::new(0));
        let mut publisher = StylesheetPublisher::default();
        let counter = Rc::clone(&calls);
        publisher.subscribe(move |_| counter.set(counter.get() + 1));

        let mut eras = BTreeMap::new();
        eras.insert("e1".to_string(), Era::new("Iron", 0, 1, "#334455"));

        assert!(publisher.publish(Stylesheet::for_eras(&eras)));
        assert!(!publisher.publish(Stylesheet::for_eras(&eras)));
        assert_eq!(calls.get(), 1);
    }
}
