//! In-memory model of the portfolio page.
//!
//! The page is what the pipelines and controllers mutate; [`crate::site`]
//! serializes it to HTML at the end. It owns:
//!
//! - **Containers**: the elements a pipeline fully overwrites on each render
//! - **Text slots**: `data-ui-text` elements filled from `ui-text.json`
//! - **Root attributes**: `data-bs-theme` on `<html>`
//! - **Theme toggle**: the button's accessible label and icon
//!
//! A container's body is always whole: empty, a list of fragments from one
//! render, or a single error message. There is no way to append to it.

use crate::animation::Headline;
use crate::reveal::{RevealObserver, VISIBLE_CLASS};
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// The two fixture languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Nl,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Nl, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::Nl => "nl",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nl" => Ok(Locale::Nl),
            "en" => Ok(Locale::En),
            other => Err(format!("unknown locale '{other}' (expected nl or en)")),
        }
    }
}

/// Top-level element of a rendered fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentTag {
    Article,
    Div,
    Li,
    Section,
}

/// One top-level piece of a container: a record, or a year group.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    tag: FragmentTag,
    class: String,
    body: String,
}

impl Fragment {
    pub fn new(tag: FragmentTag, class: impl Into<String>, body: Markup) -> Self {
        Self {
            tag,
            class: class.into(),
            body: body.into_string(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    fn render(&self, revealed: bool) -> Markup {
        let class = if revealed {
            format!("{} {}", self.class, VISIBLE_CLASS)
        } else {
            self.class.clone()
        };
        let body = PreEscaped(self.body.as_str());
        html! {
            @match self.tag {
                FragmentTag::Article => article class=(class) { (body) },
                FragmentTag::Div => div class=(class) { (body) },
                FragmentTag::Li => li class=(class) { (body) },
                FragmentTag::Section => section class=(class) { (body) },
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ContainerBody {
    #[default]
    Empty,
    Entries(Vec<Fragment>),
    Error(String),
}

/// Proof that a render was started against a container at a given generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderTicket {
    container: String,
    generation: u64,
}

impl RenderTicket {
    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStatus {
    Applied,
    /// A newer render was started after this one; its result was dropped.
    Stale,
}

/// An element whose children a single pipeline owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: String,
    body: ContainerBody,
    classes: BTreeSet<String>,
    issued: u64,
    reveal: RevealObserver,
}

impl Container {
    pub fn new(id: impl Into<String>, reveal_threshold: f64) -> Self {
        Self {
            id: id.into(),
            body: ContainerBody::Empty,
            classes: BTreeSet::new(),
            issued: 0,
            reveal: RevealObserver::new(reveal_threshold),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &ContainerBody {
        &self.body
    }

    /// Start a render. Any ticket issued before this one becomes stale.
    pub fn begin(&mut self) -> RenderTicket {
        self.issued += 1;
        RenderTicket {
            container: self.id.clone(),
            generation: self.issued,
        }
    }

    /// Replace the whole body with the result of the render `ticket` started,
    /// unless a newer render has been started since.
    pub fn commit(&mut self, ticket: &RenderTicket, body: ContainerBody) -> CommitStatus {
        if ticket.container != self.id || ticket.generation != self.issued {
            tracing::debug!(
                container = %self.id,
                ticket = ticket.generation,
                current = self.issued,
                "dropping stale render"
            );
            return CommitStatus::Stale;
        }
        let count = match &body {
            ContainerBody::Entries(fragments) => fragments.len(),
            _ => 0,
        };
        self.body = body;
        self.reveal.observe(count);
        CommitStatus::Applied
    }

    pub fn fragments(&self) -> &[Fragment] {
        match &self.body {
            ContainerBody::Entries(fragments) => fragments,
            _ => &[],
        }
    }

    pub fn entry_count(&self) -> usize {
        self.fragments().len()
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            ContainerBody::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Report fragment visibility. Returns `true` if the fragment was revealed
    /// by this call.
    pub fn notify_visibility(&mut self, index: usize, ratio: f64) -> bool {
        self.reveal.notify(index, ratio)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.reveal.is_revealed(index)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Space-separated container classes, or `None` when there are none.
    pub fn class_attr(&self) -> Option<String> {
        (!self.classes.is_empty()).then(|| self.classes.iter().cloned().collect::<Vec<_>>().join(" "))
    }

    /// Render the container's children.
    pub fn render(&self) -> Markup {
        html! {
            @match &self.body {
                ContainerBody::Empty => {},
                ContainerBody::Entries(fragments) => {
                    @for (i, fragment) in fragments.iter().enumerate() {
                        (fragment.render(self.reveal.is_revealed(i)))
                    }
                },
                ContainerBody::Error(message) => {
                    p.text-danger.render-error role="alert" { (message) }
                },
            }
        }
    }
}

/// An element whose text comes from `ui-text.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSlot {
    pub key: String,
    pub text: String,
}

/// Accessible state of the light/dark toggle button.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeToggle {
    pub aria_label: String,
    pub title: String,
    pub aria_pressed: bool,
    pub hidden_text: String,
    pub icon_class: String,
}

impl Default for ThemeToggle {
    fn default() -> Self {
        Self {
            aria_label: "Switch to dark theme".to_string(),
            title: "Switch to dark theme".to_string(),
            aria_pressed: false,
            hidden_text: "Switch to dark theme".to_string(),
            icon_class: "bi bi-sun-fill".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    locale: Locale,
    root_attributes: BTreeMap<String, String>,
    containers: BTreeMap<String, Container>,
    text_slots: Vec<TextSlot>,
    theme_toggle: ThemeToggle,
    age: Option<u32>,
    headline: Option<Headline>,
}

impl Page {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            root_attributes: BTreeMap::new(),
            containers: BTreeMap::new(),
            text_slots: Vec::new(),
            theme_toggle: ThemeToggle::default(),
            age: None,
            headline: None,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    pub fn add_container(&mut self, id: &str, reveal_threshold: f64) -> &mut Container {
        self.containers
            .entry(id.to_string())
            .or_insert_with(|| Container::new(id, reveal_threshold))
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn container_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    /// Empty markup for a container that was never registered.
    pub fn render_container(&self, id: &str) -> Markup {
        self.container(id)
            .map(Container::render)
            .unwrap_or_else(|| html! {})
    }

    pub fn add_text_slot(&mut self, key: &str, default_text: &str) {
        self.text_slots.push(TextSlot {
            key: key.to_string(),
            text: default_text.to_string(),
        });
    }

    pub fn text_slot(&self, key: &str) -> Option<&TextSlot> {
        self.text_slots.iter().find(|slot| slot.key == key)
    }

    pub fn text_slots_mut(&mut self) -> impl Iterator<Item = &mut TextSlot> {
        self.text_slots.iter_mut()
    }

    /// Current text for a slot; empty if no such slot exists.
    pub fn text(&self, key: &str) -> &str {
        self.text_slot(key).map(|slot| slot.text.as_str()).unwrap_or("")
    }

    pub fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn theme_toggle(&self) -> &ThemeToggle {
        &self.theme_toggle
    }

    pub fn theme_toggle_mut(&mut self) -> &mut ThemeToggle {
        &mut self.theme_toggle
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = Some(age);
    }

    pub fn age(&self) -> Option<u32> {
        self.age
    }

    pub fn set_headline(&mut self, headline: Headline) {
        self.headline = Some(headline);
    }

    pub fn headline(&self) -> Option<&Headline> {
        self.headline.as_ref()
    }

    pub fn headline_mut(&mut self) -> Option<&mut Headline> {
        self.headline.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(text: &str) -> Fragment {
        Fragment::new(FragmentTag::Div, "item", html! { span { (text) } })
    }

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!(" nl ".parse::<Locale>().unwrap(), Locale::Nl);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn commit_replaces_whole_body() {
        let mut c = Container::new("list", 0.12);
        let t1 = c.begin();
        c.commit(&t1, ContainerBody::Entries(vec![fragment("a"), fragment("b")]));
        let t2 = c.begin();
        c.commit(&t2, ContainerBody::Entries(vec![fragment("c")]));
        assert_eq!(c.entry_count(), 1);
        assert!(c.render().into_string().contains(">c<"));
        assert!(!c.render().into_string().contains(">a<"));
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut c = Container::new("list", 0.12);
        let old = c.begin();
        let new = c.begin();
        assert_eq!(
            c.commit(&new, ContainerBody::Entries(vec![fragment("new")])),
            CommitStatus::Applied
        );
        assert_eq!(
            c.commit(&old, ContainerBody::Entries(vec![fragment("old"), fragment("old2")])),
            CommitStatus::Stale
        );
        assert_eq!(c.entry_count(), 1);
        assert!(c.render().into_string().contains("new"));
    }

    #[test]
    fn ticket_for_other_container_is_stale() {
        let mut a = Container::new("a", 0.12);
        let mut b = Container::new("b", 0.12);
        let ticket = a.begin();
        b.begin();
        assert_eq!(b.commit(&ticket, ContainerBody::Empty), CommitStatus::Stale);
    }

    #[test]
    fn error_body_renders_single_message() {
        let mut c = Container::new("list", 0.12);
        let t = c.begin();
        c.commit(&t, ContainerBody::Error("Could not load data.".to_string()));
        let html = c.render().into_string();
        assert_eq!(c.entry_count(), 0);
        assert_eq!(html.matches("render-error").count(), 1);
        assert!(html.contains("Could not load data."));
    }

    #[test]
    fn revealed_fragment_gets_visible_class() {
        let mut c = Container::new("list", 0.12);
        let t = c.begin();
        c.commit(&t, ContainerBody::Entries(vec![fragment("a"), fragment("b")]));
        assert!(c.notify_visibility(1, 0.2));
        let html = c.render().into_string();
        assert!(html.contains(r#"<div class="item">"#));
        assert!(html.contains(r#"<div class="item in-view">"#));
    }

    #[test]
    fn recommit_resets_reveal_state() {
        let mut c = Container::new("list", 0.12);
        let t = c.begin();
        c.commit(&t, ContainerBody::Entries(vec![fragment("a")]));
        c.notify_visibility(0, 1.0);
        let t = c.begin();
        c.commit(&t, ContainerBody::Entries(vec![fragment("a")]));
        assert!(!c.is_revealed(0));
    }

    #[test]
    fn container_classes() {
        let mut c = Container::new("skills-list", 0.3);
        assert_eq!(c.class_attr(), None);
        c.add_class("bars-filled");
        assert!(c.has_class("bars-filled"));
        assert_eq!(c.class_attr().as_deref(), Some("bars-filled"));
        c.remove_class("bars-filled");
        assert!(!c.has_class("bars-filled"));
    }

    #[test]
    fn text_slot_lookup() {
        let mut page = Page::new(Locale::Nl);
        page.add_text_slot("nav.home", "Start");
        assert_eq!(page.text("nav.home"), "Start");
        assert_eq!(page.text("nav.none"), "");
    }

    #[test]
    fn unknown_container_renders_empty() {
        let page = Page::new(Locale::En);
        assert_eq!(page.render_container("missing").into_string(), "");
    }
}
