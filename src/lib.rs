//! # Folio
//!
//! Renders a bilingual single-page portfolio from a handful of JSON fixtures.
//! Each locale has its own fixture folder; the site is a static `index.html`
//! per locale with every data container already filled in.
//!
//! # Architecture: One Pipeline per Container
//!
//! Every data container on the page is owned by exactly one render pipeline:
//!
//! ```text
//! fetch  →  status check  →  JSON parse  →  transform  →  template  →  commit
//! ```
//!
//! - **Fetch** goes through the [`fetch::Fetcher`] trait, so the same pipeline
//!   reads from a directory, an HTTP server, or an in-memory mock.
//! - **Transform** decodes leniently and orders the records
//!   (experience grouped by year, newest first; academic newest first).
//! - **Template** maps each record to one escaped [`page::Fragment`].
//! - **Commit** replaces the container body as a whole, guarded by a
//!   generation ticket so a slow, outdated render can never overwrite a
//!   newer one.
//!
//! Any failure along the way becomes a single inline
//! `Could not load <kind> data.` message in the container.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Fixture records with lenient field decoding |
//! | [`fetch`] | `Fetcher` trait; filesystem and HTTP implementations |
//! | [`pipeline`] | `ContentRenderPipeline`: fetch → transform → template → commit |
//! | [`order`] | Sorting and year grouping |
//! | [`templates`] | Maud markup for each data kind |
//! | [`page`] | Page model: containers, fragments, text slots, theme toggle |
//! | [`reveal`] | One-shot reveal-on-scroll bookkeeping |
//! | [`ui_text`] | Dot-path label lookup and binding |
//! | [`theme`] | Theme and language preferences over a fail-soft store |
//! | [`navigator`] | Section navigation state machine |
//! | [`timeline`] | Virtual clock with generation-guarded callbacks |
//! | [`animation`] | Headline letter colours and skill-bar fill |
//! | [`age`] | Age from the configured birth date |
//! | [`app`] | `AppContext`: everything one page load owns |
//! | [`site`] | Static build: one document per locale, asset copy |
//! | [`config`] | `config.toml` loading, merging, validation, colour CSS |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## No Ambient State
//!
//! The page, the preference store, the fetcher, and the animation clock all
//! live in an [`app::AppContext`] built once per page load and passed
//! explicitly. Tests build as many contexts as they like, side by side.
//!
//! ## Timers as Data
//!
//! Animations are scheduled on a [`timeline::Timeline`] rather than real
//! timers. Each callback carries the generation of the channel that scheduled
//! it; leaving a section bumps the generation and the pending callbacks are
//! dropped. Tests drive the clock by hand.
//!
//! ## Maud for Markup
//!
//! All HTML is generated with [Maud](https://maud.lambda.xyz/). Interpolation
//! is escaped, so fixture text such as `<script>` shows up as text.

pub mod age;
pub mod animation;
pub mod app;
pub mod config;
pub mod fetch;
pub mod navigator;
pub mod order;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod reveal;
pub mod site;
pub mod templates;
pub mod theme;
pub mod timeline;
pub mod types;
pub mod ui_text;

#[cfg(test)]
pub(crate) mod test_helpers;
