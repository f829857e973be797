//! Static site build.
//!
//! Renders one self-contained `index.html` per locale: every container is
//! loaded through the render pipeline first, so the page ships with its
//! content already in place, and the embedded script only handles section
//! switching, reveal-on-scroll, the theme toggle, and the headline.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html          # default locale
//! ├── en/
//! │   └── index.html      # every other locale
//! └── assets/             # copied verbatim from <data>/assets
//! ```
//!
//! A page whose rendered bytes hash the same as the file already on disk is
//! left alone, so repeated builds do not touch unchanged files.

use crate::animation::{Headline, SKILLS_CONTAINER};
use crate::app::{
    ACADEMIC_CONTAINER, AppContext, LoadReport, TECH_CONTAINER, TIMELINE_CONTAINER,
};
use crate::config::{self, ConfigError, SiteConfig};
use crate::navigator::SectionId;
use crate::page::{Locale, Page, ThemeToggle};
use crate::theme::{MemoryPreferenceStore, THEME_ATTRIBUTE};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/site.js");

/// Text slots on every page, with the text shown until `ui-text.json` binds.
pub const TEXT_SLOTS: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.about", "Over mij"),
    ("nav.skills", "Vaardigheden"),
    ("nav.experience", "Ervaring"),
    ("nav.education", "Opleiding"),
    ("nav.contact", "Contact"),
    ("hero.greeting", "Hallo, ik ben"),
    ("hero.tagline", "Welkom op mijn portfolio."),
    ("about.title", "Over mij"),
    ("about.intro", "Ik ben"),
    ("about.age_suffix", "jaar oud."),
    ("skills.title", "Vaardigheden"),
    ("skills.tech_title", "Technologieën"),
    ("experience.title", "Werkervaring"),
    ("education.title", "Opleiding"),
    ("contact.title", "Contact"),
    ("contact.text", "Neem gerust contact met me op."),
    ("footer.rights", "Alle rechten voorbehouden."),
];

fn version() -> &'static str {
    match env!("GIT_HASH") {
        "" => env!("CARGO_PKG_VERSION"),
        hash => hash,
    }
}

/// A page with every container and text slot registered and nothing loaded.
pub fn page_shell(locale: Locale, config: &SiteConfig) -> Page {
    let mut page = Page::new(locale);
    let reveal = &config.reveal;
    page.add_container(TIMELINE_CONTAINER, reveal.threshold);
    page.add_container(ACADEMIC_CONTAINER, reveal.threshold);
    page.add_container(TECH_CONTAINER, reveal.threshold);
    page.add_container(SKILLS_CONTAINER, reveal.skills_threshold);
    for (key, default_text) in TEXT_SLOTS {
        page.add_text_slot(key, default_text);
    }
    page.set_headline(Headline::new(&config.site.owner));
    page
}

/// Where `locale`'s page lives, relative to the output root.
pub fn page_path(locale: Locale, default: Locale) -> PathBuf {
    if locale == default {
        PathBuf::from("index.html")
    } else {
        Path::new(locale.code()).join("index.html")
    }
}

/// Relative link from `from`'s page to `to`'s page.
pub fn locale_href(from: Locale, to: Locale, default: Locale) -> String {
    let up = if from == default { "" } else { "../" };
    if to == default {
        if up.is_empty() { "./".to_string() } else { up.to_string() }
    } else {
        format!("{up}{}/", to.code())
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn slot(page: &Page, key: &str) -> Markup {
    html! {
        span data-ui-text=(key) { (page.text(key)) }
    }
}

fn container_block(page: &Page, id: &str) -> Markup {
    let classes = page.container(id).and_then(|c| c.class_attr());
    html! {
        div id=(id) class=[classes] aria-live="polite" {
            (page.render_container(id))
        }
    }
}

fn theme_toggle_button(toggle: &ThemeToggle) -> Markup {
    html! {
        button.theme-toggle type="button" data-theme-toggle
            aria-label=(toggle.aria_label) title=(toggle.title)
            aria-pressed=(if toggle.aria_pressed { "true" } else { "false" }) {
            i class=(toggle.icon_class) aria-hidden="true" {}
            span.visually-hidden { (toggle.hidden_text) }
        }
    }
}

fn site_header(page: &Page, default: Locale) -> Markup {
    html! {
        header.site-header {
            nav.site-nav {
                a href="#home" data-nav="home" { (slot(page, "nav.home")) }
                @for section in SectionId::ALL {
                    a href={ "#" (section.as_str()) } data-nav=(section.as_str()) {
                        (slot(page, &format!("nav.{}", section.as_str())))
                    }
                }
            }
            div.site-controls {
                nav.language-switch aria-label="Language" {
                    @for locale in Locale::ALL {
                        @if locale == page.locale() {
                            span.current-locale aria-current="page" { (locale.code().to_uppercase()) }
                        } @else {
                            a href=(locale_href(page.locale(), locale, default))
                                hreflang=(locale.code()) data-language=(locale.code()) {
                                (locale.code().to_uppercase())
                            }
                        }
                    }
                }
                (theme_toggle_button(page.theme_toggle()))
            }
        }
    }
}

fn sections(page: &Page, config: &SiteConfig) -> Markup {
    let headline = page
        .headline()
        .map(Headline::render)
        .unwrap_or_else(|| html! { (config.site.owner) });
    // The build-time age is a fallback; the script recomputes it on load.
    let birth_date = config
        .site
        .birth_date()
        .map(|date| date.format("%Y-%m-%d").to_string());
    html! {
        section id="home" class="hero" data-section="home" {
            p.lead { (slot(page, "hero.greeting")) }
            h1.animation aria-label=(config.site.owner) { (headline) }
            p { (slot(page, "hero.tagline")) }
        }
        section id="about" data-section="about" hidden {
            h2 { (slot(page, "about.title")) }
            p {
                (slot(page, "about.intro")) " "
                span data-age data-birth-date=[birth_date.as_deref()] {
                    (page.age().map(|a| a.to_string()).unwrap_or_default())
                }
                " " (slot(page, "about.age_suffix"))
            }
        }
        section id="skills" data-section="skills" hidden {
            h2 { (slot(page, "skills.title")) }
            h3.h5 { (slot(page, "skills.tech_title")) }
            (container_block(page, TECH_CONTAINER))
            (container_block(page, SKILLS_CONTAINER))
        }
        section id="experience" data-section="experience" hidden {
            h2 { (slot(page, "experience.title")) }
            (container_block(page, TIMELINE_CONTAINER))
        }
        section id="education" data-section="education" hidden {
            h2 { (slot(page, "education.title")) }
            (container_block(page, ACADEMIC_CONTAINER))
        }
        section id="contact" data-section="contact" hidden {
            h2 { (slot(page, "contact.title")) }
            p { (slot(page, "contact.text")) }
        }
    }
}

/// The full document for one loaded page.
pub fn render_document(page: &Page, config: &SiteConfig) -> Markup {
    let css = format!(
        "{}\n\n{}",
        config::generate_color_css(&config.colors),
        CSS_STATIC
    );
    let default = config.site.default_locale;
    html! {
        (DOCTYPE)
        html lang=(page.locale().code()) data-bs-theme=[page.root_attribute(THEME_ATTRIBUTE)] {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="generator" content={ "folio " (version()) };
                title { (config.site.title) }
                style { (PreEscaped(css)) }
            }
            body data-reveal-threshold=(config.reveal.threshold.to_string())
                data-skills-threshold=(config.reveal.skills_threshold.to_string()) {
                (site_header(page, default))
                main { (sections(page, config)) }
                footer.site-footer {
                    small { "© " (config.site.owner) " · " (slot(page, "footer.rights")) }
                }
                script { (PreEscaped(JS)) }
            }
        }
    }
}

// ============================================================================
// Build
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

#[derive(Debug)]
pub struct PageReport {
    pub locale: Locale,
    /// Relative to the output root.
    pub path: PathBuf,
    pub status: WriteStatus,
    pub load: LoadReport,
}

#[derive(Debug, Default)]
pub struct BuildReport {
    pub pages: Vec<PageReport>,
    pub assets_copied: usize,
}

impl BuildReport {
    pub fn is_ok(&self) -> bool {
        self.pages.iter().all(|p| p.load.is_ok())
    }
}

/// Hex SHA-256 of `content`.
pub fn digest(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Write `content` to `path` unless the file already holds the same bytes.
pub fn write_if_changed(path: &Path, content: &str) -> Result<WriteStatus, SiteError> {
    if let Ok(existing) = fs::read(path) {
        if digest(&existing) == digest(content.as_bytes()) {
            return Ok(WriteStatus::Unchanged);
        }
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(WriteStatus::Written)
}

/// Copy every file under `src` into `dst`, keeping relative paths.
pub fn copy_assets(src: &Path, dst: &Path) -> Result<usize, SiteError> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target)?;
        copied += 1;
    }
    Ok(copied)
}

/// Render every locale into `output_dir`.
///
/// Pages are built with an empty preference store, so they ship with the
/// visitor defaults (light theme); the builder's own preferences never leak
/// into the output. Fixture failures do not abort the build: the affected
/// container shows its inline error and the failure is recorded in the report.
pub fn build(
    config: &SiteConfig,
    data_root: &str,
    output_dir: &Path,
) -> Result<BuildReport, SiteError> {
    config.validate()?;
    fs::create_dir_all(output_dir)?;
    let default = config.site.default_locale;

    let mut report = BuildReport::default();
    for locale in Locale::ALL {
        let mut app = AppContext::for_locale(
            config.clone(),
            data_root,
            MemoryPreferenceStore::new(),
            locale,
        );
        let load = app.load_all();
        let html = render_document(app.page(), config).into_string();
        let path = page_path(locale, default);
        let status = write_if_changed(&output_dir.join(&path), &html)?;
        tracing::info!(locale = %locale, path = %path.display(), ?status, "page built");
        report.pages.push(PageReport {
            locale,
            path,
            status,
            load,
        });
    }

    let assets = Path::new(data_root).join("assets");
    if assets.is_dir() {
        report.assets_copied = copy_assets(&assets, &output_dir.join("assets"))?;
    }
    Ok(report)
}
