//! Page-load context: one instance per rendered page.
//!
//! [`AppContext`] owns everything that would otherwise be ambient page state:
//! the page model, the fetcher for the active locale, the theme controller,
//! the section navigator, and the animation timeline. It is built once per
//! page load and passed explicitly; nothing here is global.
//!
//! ## Loading
//!
//! ```text
//! begin tickets (all containers)
//!         │
//!         ├── experience.json ─┐
//!         ├── academic.json  ──┤  prepared in parallel (rayon)
//!         ├── skills.json    ──┤
//!         └── ui-text.json   ──┘
//!         │
//! settle in fixed order, each against its own ticket
//! ```
//!
//! Because every container's ticket is taken before any fetch starts, a load
//! that finishes after a newer one (for example after a language switch) is
//! discarded instead of overwriting the newer content.

use crate::age;
use crate::animation::{AnimationTimeline, Animator, SKILLS_CONTAINER};
use crate::config::SiteConfig;
use crate::fetch::{self, Fetcher};
use crate::navigator::{Effect, NavState, SectionId, SectionNavigator};
use crate::order;
use crate::page::{CommitStatus, ContainerBody, Fragment, Locale, Page, RenderTicket};
use crate::pipeline::{ContentRenderPipeline, RenderError};
use crate::site;
use crate::templates;
use crate::theme::{self, MemoryPreferenceStore, PreferenceStore, Theme, ThemeController};
use crate::types::{AcademicEntry, ExperienceEntry, SkillsDocument, decode_list};
use crate::ui_text::{UiTextBinder, UiTextTree};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Container ids on the page.
pub const TIMELINE_CONTAINER: &str = "timeline-items";
pub const ACADEMIC_CONTAINER: &str = "academic-list";
pub const TECH_CONTAINER: &str = "tech-icons";

/// Locale-specific labels, resolved against the same tree as the page text.
pub const UI_TEXT_FILE: &str = "ui-text.json";

/// One of the three data fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Experience,
    Academic,
    Skills,
}

impl DataKind {
    pub const ALL: [DataKind; 3] = [DataKind::Experience, DataKind::Academic, DataKind::Skills];

    pub fn file(self) -> &'static str {
        match self {
            DataKind::Experience => "experience.json",
            DataKind::Academic => "academic.json",
            DataKind::Skills => "skills.json",
        }
    }

    /// Name used in the inline error message.
    pub fn label(self) -> &'static str {
        match self {
            DataKind::Experience => "experience",
            DataKind::Academic => "academic",
            DataKind::Skills => "skills",
        }
    }

    /// Containers this fixture fills. The first one carries the error
    /// message when loading fails; the rest are cleared.
    pub fn containers(self) -> &'static [&'static str] {
        match self {
            DataKind::Experience => &[TIMELINE_CONTAINER],
            DataKind::Academic => &[ACADEMIC_CONTAINER],
            DataKind::Skills => &[TECH_CONTAINER, SKILLS_CONTAINER],
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "experience" => Ok(DataKind::Experience),
            "academic" | "education" => Ok(DataKind::Academic),
            "skills" => Ok(DataKind::Skills),
            other => Err(format!("unknown data kind '{other}'")),
        }
    }
}

/// Fetch, transform, and template one fixture. Returns one fragment list per
/// entry in [`DataKind::containers`].
pub fn prepare_kind(
    fetcher: &dyn Fetcher,
    kind: DataKind,
) -> Result<Vec<Vec<Fragment>>, RenderError> {
    let pipeline = ContentRenderPipeline::new(fetcher);
    match kind {
        DataKind::Experience => {
            let groups = pipeline.prepare(
                kind.file(),
                |value| order::experience_groups(decode_list::<ExperienceEntry>(value, "experience")),
                templates::experience_group,
            )?;
            Ok(vec![groups])
        }
        DataKind::Academic => {
            let items = pipeline.prepare(
                kind.file(),
                |value| order::sort_academic(decode_list::<AcademicEntry>(value, "academic")),
                templates::academic_item,
            )?;
            Ok(vec![items])
        }
        DataKind::Skills => {
            let document = SkillsDocument::from_value(pipeline.fetch_json(kind.file())?);
            let tech = document.categories.iter().map(templates::skill_category).collect();
            let bars = document.skills.iter().map(templates::skill_bar).collect();
            Ok(vec![tech, bars])
        }
    }
}

/// What happened to one fixture during a load.
#[derive(Debug)]
pub struct KindOutcome {
    pub kind: DataKind,
    /// Entries committed to the primary container, or the load error.
    pub result: Result<usize, RenderError>,
    /// `Stale` when a newer render had already claimed the containers.
    pub status: CommitStatus,
}

#[derive(Debug)]
pub struct LoadReport {
    pub locale: Locale,
    pub kinds: Vec<KindOutcome>,
    /// Text slots updated from the UI-text tree, or why it was skipped.
    pub ui_text: Result<usize, RenderError>,
}

impl LoadReport {
    pub fn failures(&self) -> impl Iterator<Item = &KindOutcome> {
        self.kinds.iter().filter(|k| k.result.is_err())
    }

    pub fn is_ok(&self) -> bool {
        self.failures().next().is_none()
    }
}

pub struct AppContext<S: PreferenceStore> {
    config: SiteConfig,
    data_root: String,
    fetcher: Box<dyn Fetcher>,
    page: Page,
    theme: ThemeController<S>,
    navigator: SectionNavigator,
    animator: Animator,
    timeline: AnimationTimeline,
    rng: StdRng,
}

impl<S: PreferenceStore> AppContext<S> {
    /// Build the context for `data_root`, with the locale taken from the
    /// stored preference (or the configured default).
    pub fn new(config: SiteConfig, data_root: &str, store: S) -> Self {
        let locale = theme::read_language(&store, config.site.default_locale);
        Self::for_locale(config, data_root, store, locale)
    }

    /// Build the context for an explicit locale, ignoring the stored one.
    pub fn for_locale(config: SiteConfig, data_root: &str, store: S, locale: Locale) -> Self {
        let fetcher = fetch::for_root(&locale_root(data_root, &config, locale));
        Self::with_fetcher(config, data_root, store, locale, fetcher)
    }

    pub fn with_fetcher(
        config: SiteConfig,
        data_root: &str,
        store: S,
        locale: Locale,
        fetcher: Box<dyn Fetcher>,
    ) -> Self {
        let mut page = site::page_shell(locale, &config);
        if let Some(birth) = config.site.birth_date() {
            page.set_age(age::age_on(birth, age::today()));
        }
        let theme = ThemeController::new(store);
        theme.apply(&mut page);
        let animator = Animator::new(config.animation.clone());
        Self {
            config,
            data_root: data_root.to_string(),
            fetcher,
            page,
            theme,
            navigator: SectionNavigator::new(),
            animator,
            timeline: AnimationTimeline::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Replace the colour RNG, for reproducible animation.
    pub fn seed_rng(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn locale(&self) -> Locale {
        self.page.locale()
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn nav_state(&self) -> NavState {
        self.navigator.state()
    }

    /// Where fixtures are read from, as the fetcher reports it.
    pub fn source(&self) -> String {
        self.fetcher.describe()
    }

    pub fn timeline(&self) -> &AnimationTimeline {
        &self.timeline
    }

    /// Load every fixture and the UI text, then bind the text slots.
    pub fn load_all(&mut self) -> LoadReport {
        let tickets: Vec<(DataKind, Vec<RenderTicket>)> = DataKind::ALL
            .iter()
            .map(|&kind| (kind, self.begin(kind)))
            .collect();

        let fetcher = self.fetcher.as_ref();
        let (prepared, ui_text) = rayon::join(
            || {
                DataKind::ALL
                    .par_iter()
                    .map(|&kind| prepare_kind(fetcher, kind))
                    .collect::<Vec<_>>()
            },
            || ContentRenderPipeline::new(fetcher).fetch_json(UI_TEXT_FILE),
        );

        let kinds = tickets
            .into_iter()
            .zip(prepared)
            .map(|((kind, tickets), outcome)| self.commit(kind, &tickets, outcome))
            .collect();

        let ui_text = ui_text.map(|value| UiTextBinder::bind(&UiTextTree::new(value), &mut self.page));
        if let Err(err) = &ui_text {
            tracing::warn!(%err, "UI text unavailable, keeping default labels");
        }

        LoadReport {
            locale: self.locale(),
            kinds,
            ui_text,
        }
    }

    /// Render one fixture into its containers.
    pub fn render_kind(&mut self, kind: DataKind) -> KindOutcome {
        let tickets = self.begin(kind);
        let outcome = prepare_kind(self.fetcher.as_ref(), kind);
        self.commit(kind, &tickets, outcome)
    }

    fn begin(&mut self, kind: DataKind) -> Vec<RenderTicket> {
        kind.containers()
            .iter()
            .filter_map(|id| self.page.container_mut(id).map(|c| c.begin()))
            .collect()
    }

    fn commit(
        &mut self,
        kind: DataKind,
        tickets: &[RenderTicket],
        outcome: Result<Vec<Vec<Fragment>>, RenderError>,
    ) -> KindOutcome {
        let (bodies, result): (Vec<ContainerBody>, _) = match outcome {
            Ok(lists) => {
                let entries = lists.first().map_or(0, Vec::len);
                (lists.into_iter().map(ContainerBody::Entries).collect(), Ok(entries))
            }
            Err(err) => {
                let bodies = (0..tickets.len())
                    .map(|i| match i {
                        0 => ContainerBody::Error(templates::load_error_message(kind.label())),
                        _ => ContainerBody::Empty,
                    })
                    .collect();
                (bodies, Err(err))
            }
        };

        let mut status = CommitStatus::Applied;
        for (ticket, body) in tickets.iter().zip(bodies) {
            let Some(container) = self.page.container_mut(ticket.container()) else {
                continue;
            };
            if container.commit(ticket, body) == CommitStatus::Stale {
                status = CommitStatus::Stale;
            }
        }

        match &result {
            Ok(entries) => tracing::info!(kind = %kind, entries, ?status, "rendered"),
            Err(err) => tracing::warn!(kind = %kind, %err, ?status, "render failed"),
        }
        KindOutcome {
            kind,
            result,
            status,
        }
    }

    /// Show a section and run whatever the transition asks for.
    pub fn navigate_to(&mut self, id: SectionId) -> Vec<Effect> {
        let effects = self.navigator.navigate_to(id);
        self.run_effects(&effects);
        effects
    }

    pub fn navigate_home(&mut self) -> Vec<Effect> {
        let effects = self.navigator.navigate_home();
        self.run_effects(&effects);
        effects
    }

    fn run_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match *effect {
                Effect::Render(kind) => {
                    self.render_kind(kind);
                }
                Effect::StartSkillAnimation => self.animator.enter_skills(&mut self.timeline),
                Effect::ResetSkillAnimation => {
                    self.animator.leave_skills(&mut self.timeline, &mut self.page)
                }
            }
        }
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme.toggle(&mut self.page)
    }

    /// Switch to `locale`: persist it, repoint the fetcher at that locale's
    /// folder, and reload everything.
    pub fn switch_language(&mut self, locale: Locale) -> LoadReport {
        theme::write_language(self.theme.store_mut(), locale);
        let root = locale_root(&self.data_root, &self.config, locale);
        self.fetcher = fetch::for_root(&root);
        self.page.set_locale(locale);
        tracing::info!(locale = %locale, root = %root, "language switched");
        self.load_all()
    }

    /// Report that entry `index` of `container` is `ratio` visible.
    pub fn report_visibility(&mut self, container: &str, index: usize, ratio: f64) -> bool {
        self.page
            .container_mut(container)
            .is_some_and(|c| c.notify_visibility(index, ratio))
    }

    /// Schedule the first headline cycle.
    pub fn start_animation(&mut self) {
        self.animator.start(&mut self.timeline);
    }

    /// Advance the virtual clock and apply every action that came due,
    /// including follow-ups scheduled with no delay. Returns how many ran.
    pub fn tick(&mut self, ms: u64) -> usize {
        let mut applied = 0;
        let mut due = self.timeline.advance(ms);
        while !due.is_empty() {
            for action in due {
                self.animator
                    .apply(action, &mut self.timeline, &mut self.page, &mut self.rng);
                applied += 1;
            }
            // A saturated clock cannot move past follow-ups, so stop there.
            if self.timeline.now() == u64::MAX {
                break;
            }
            due = self.timeline.advance(0);
        }
        applied
    }
}

/// Resolve a `render` target: a data kind name, or `tech` for the skill
/// categories. Returns the kind to load and the container to print.
pub fn render_target(name: &str) -> Option<(DataKind, &'static str)> {
    if name.trim().eq_ignore_ascii_case("tech") {
        return Some((DataKind::Skills, TECH_CONTAINER));
    }
    let kind: DataKind = name.parse().ok()?;
    let container = match kind {
        DataKind::Skills => SKILLS_CONTAINER,
        other => other.containers()[0],
    };
    Some((kind, container))
}

/// Load every locale without persisting anything. Each report is paired with
/// the fixture root it was loaded from.
pub fn check_all(config: &SiteConfig, data_root: &str) -> Vec<(String, LoadReport)> {
    Locale::ALL
        .into_iter()
        .map(|locale| {
            let mut app = AppContext::for_locale(
                config.clone(),
                data_root,
                MemoryPreferenceStore::new(),
                locale,
            );
            let report = app.load_all();
            (app.source(), report)
        })
        .collect()
}

/// Where `locale`'s fixtures live under `data_root`.
pub fn locale_root(data_root: &str, config: &SiteConfig, locale: Locale) -> String {
    let folder = config.locales.folder(locale);
    if data_root.is_empty() || data_root == "." {
        folder.to_string()
    } else {
        format!("{}/{}", data_root.trim_end_matches('/'), folder)
    }
}
