//! Static interface text from `ui-text.json`.
//!
//! Elements in the page shell carry a `data-ui-text="nav.home"` key. Binding
//! resolves each key against the tree one segment at a time; a key that does
//! not resolve leaves the slot's current text alone, so a partial fixture only
//! translates what it knows about.

use crate::page::Page;
use serde_json::Value;

/// Nested text mapping, arbitrary depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiTextTree {
    root: Value,
}

impl UiTextTree {
    pub fn new(root: Value) -> Self {
        if !root.is_object() {
            tracing::warn!("ui-text fixture is not an object, no text will be bound");
        }
        Self { root }
    }

    /// Resolve a dot-delimited key. Only leaves resolve: a path that stops at
    /// an object, or misses a segment, yields `None`.
    pub fn resolve(&self, key: &str) -> Option<String> {
        let leaf = key
            .split('.')
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))?;
        match leaf {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

pub struct UiTextBinder;

impl UiTextBinder {
    /// Fill every text slot on the page that resolves. Returns how many
    /// slots were updated.
    pub fn bind(tree: &UiTextTree, page: &mut Page) -> usize {
        let mut bound = 0;
        for slot in page.text_slots_mut() {
            match tree.resolve(&slot.key) {
                Some(text) => {
                    slot.text = text;
                    bound += 1;
                }
                None => tracing::debug!(key = %slot.key, "ui text key not found, keeping default"),
            }
        }
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Locale, Page};
    use serde_json::json;

    fn tree() -> UiTextTree {
        UiTextTree::new(json!({
            "nav": {"home": "Home", "skills": "Skills"},
            "footer": {"year": 2025},
            "hero": {"title": {"line": "Hi"}}
        }))
    }

    #[test]
    fn resolves_nested_keys() {
        let t = tree();
        assert_eq!(t.resolve("nav.home").as_deref(), Some("Home"));
        assert_eq!(t.resolve("footer.year").as_deref(), Some("2025"));
        assert_eq!(t.resolve("hero.title.line").as_deref(), Some("Hi"));
    }

    #[test]
    fn missing_or_branch_keys_do_not_resolve() {
        let t = tree();
        assert_eq!(t.resolve("nav.projects"), None);
        assert_eq!(t.resolve("nav"), None);
        assert_eq!(t.resolve("nav.home.deeper"), None);
        assert_eq!(t.resolve(""), None);
    }

    #[test]
    fn bind_keeps_text_for_missing_keys() {
        let mut page = Page::new(Locale::En);
        page.add_text_slot("nav.projects", "Projecten");
        page.add_text_slot("nav.home", "Start");

        let bound = UiTextBinder::bind(&tree(), &mut page);

        assert_eq!(bound, 1);
        assert_eq!(page.text_slot("nav.projects").unwrap().text, "Projecten");
        assert_eq!(page.text_slot("nav.home").unwrap().text, "Home");
    }

    #[test]
    fn bind_tolerates_non_object_tree() {
        let mut page = Page::new(Locale::Nl);
        page.add_text_slot("nav.home", "Start");
        let bound = UiTextBinder::bind(&UiTextTree::new(json!([1, 2])), &mut page);
        assert_eq!(bound, 0);
        assert_eq!(page.text_slot("nav.home").unwrap().text, "Start");
    }
}
