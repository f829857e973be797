//! The fetch → transform → render pipeline.
//!
//! One pipeline run owns one [`Container`]:
//!
//! ```text
//! fetch(locator) ──► status check ──► JSON parse ──► transform ──► template ──► commit
//!      │                  │                │                                   │
//!   Fetch error     HttpStatus error   Parse error                    whole-body replace
//!      └──────────────────┴────────────────┴──► single inline error message ──┘
//! ```
//!
//! The transform does the validation and ordering (`Value -> Vec<T>`); the
//! template maps each resulting record to one top-level fragment. Rendering
//! twice with the same inputs yields the same container body, because a commit
//! replaces the body instead of appending to it.
//!
//! [`ContentRenderPipeline::prepare`] is the pure half and is safe to run on
//! several threads at once; [`settle`] is the half that touches the container.

use crate::fetch::{FetchError, Fetcher};
use crate::page::{CommitStatus, Container, ContainerBody, Fragment, RenderTicket};
use crate::templates::load_error_message;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("{locator} answered HTTP {status}")]
    HttpStatus { locator: String, status: u16 },
    #[error("{locator} is not valid JSON: {source}")]
    Parse {
        locator: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outcome of a render that reached the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub entries: usize,
    pub status: CommitStatus,
}

pub struct ContentRenderPipeline<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> ContentRenderPipeline<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch a resource and parse it as JSON.
    pub fn fetch_json(&self, locator: &str) -> Result<Value, RenderError> {
        let response = self.fetcher.fetch(locator)?;
        if !response.is_success() {
            return Err(RenderError::HttpStatus {
                locator: locator.to_string(),
                status: response.status,
            });
        }
        serde_json::from_str(&response.body).map_err(|source| RenderError::Parse {
            locator: locator.to_string(),
            source,
        })
    }

    /// Fetch, transform, and template without touching any container.
    pub fn prepare<T, F, G>(
        &self,
        locator: &str,
        transform: F,
        template: G,
    ) -> Result<Vec<Fragment>, RenderError>
    where
        F: FnOnce(Value) -> Vec<T>,
        G: Fn(&T) -> Fragment,
    {
        let value = self.fetch_json(locator)?;
        Ok(build_fragments(value, transform, template))
    }

    /// Render `locator` into `container`, replacing whatever it held.
    ///
    /// On failure the container shows one inline error message naming
    /// `kind`, and the error is returned for reporting.
    pub fn render<T, F, G>(
        &self,
        locator: &str,
        container: &mut Container,
        kind: &str,
        transform: F,
        template: G,
    ) -> Result<RenderReport, RenderError>
    where
        F: FnOnce(Value) -> Vec<T>,
        G: Fn(&T) -> Fragment,
    {
        let ticket = container.begin();
        let outcome = self.prepare(locator, transform, template);
        settle(container, &ticket, kind, outcome)
    }
}

/// Apply a transform and template to an already-parsed value.
pub fn build_fragments<T, F, G>(value: Value, transform: F, template: G) -> Vec<Fragment>
where
    F: FnOnce(Value) -> Vec<T>,
    G: Fn(&T) -> Fragment,
{
    transform(value).iter().map(template).collect()
}

/// Commit a prepared outcome to the container that issued `ticket`.
pub fn settle(
    container: &mut Container,
    ticket: &RenderTicket,
    kind: &str,
    outcome: Result<Vec<Fragment>, RenderError>,
) -> Result<RenderReport, RenderError> {
    match outcome {
        Ok(fragments) => {
            let entries = fragments.len();
            let status = container.commit(ticket, ContainerBody::Entries(fragments));
            tracing::info!(container = %container.id(), kind, entries, ?status, "rendered");
            Ok(RenderReport { entries, status })
        }
        Err(err) => {
            let status = container.commit(ticket, ContainerBody::Error(load_error_message(kind)));
            tracing::warn!(container = %container.id(), kind, %err, ?status, "render failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order;
    use crate::templates;
    use crate::test_helpers::MockFetcher;
    use crate::types::{AcademicEntry, ExperienceEntry, SkillsDocument, decode_list};

    fn academic_transform(value: Value) -> Vec<AcademicEntry> {
        order::sort_academic(decode_list(value, "academic"))
    }

    fn experience_transform(value: Value) -> Vec<order::YearGroup> {
        order::experience_groups(decode_list::<ExperienceEntry>(value, "experience"))
    }

    #[test]
    fn renders_in_transform_order() {
        let fetcher = MockFetcher::new().with_json(
            "academic.json",
            r#"[{"school":"A","startYear":2020,"endYear":2022},{"school":"B","startYear":2018,"endYear":2020}]"#,
        );
        let mut container = Container::new("academic-list", 0.12);
        let report = ContentRenderPipeline::new(&fetcher)
            .render(
                "academic.json",
                &mut container,
                "academic",
                academic_transform,
                templates::academic_item,
            )
            .unwrap();

        assert_eq!(report.entries, 2);
        assert_eq!(report.status, CommitStatus::Applied);
        let html = container.render().into_string();
        let a = html.find(">A").unwrap();
        let b = html.find(">B").unwrap();
        assert!(a < b, "expected A before B in {html}");
    }

    #[test]
    fn render_twice_is_idempotent() {
        let fetcher = MockFetcher::new().with_json(
            "experience.json",
            r#"[{"company":"X","year":2020,"id":1},{"company":"Y","year":2021,"id":2}]"#,
        );
        let pipeline = ContentRenderPipeline::new(&fetcher);
        let mut container = Container::new("timeline-items", 0.12);

        pipeline
            .render("experience.json", &mut container, "experience", experience_transform, templates::experience_group)
            .unwrap();
        let first = container.render().into_string();
        pipeline
            .render("experience.json", &mut container, "experience", experience_transform, templates::experience_group)
            .unwrap();
        let second = container.render().into_string();

        assert_eq!(first, second);
        assert_eq!(container.entry_count(), 2);
        assert_eq!(second.matches("timeline-item card").count(), 2);
    }

    #[test]
    fn http_404_leaves_single_error_node() {
        let fetcher = MockFetcher::new().with_status("academic.json", 404);
        let mut container = Container::new("academic-list", 0.12);
        let result = ContentRenderPipeline::new(&fetcher).render(
            "academic.json",
            &mut container,
            "academic",
            academic_transform,
            templates::academic_item,
        );

        assert!(matches!(result, Err(RenderError::HttpStatus { status: 404, .. })));
        let html = container.render().into_string();
        assert_eq!(container.entry_count(), 0);
        assert_eq!(html.matches("<p").count(), 1);
        assert!(html.contains("Could not load academic data."));
        assert!(!html.contains("academic-item"));
    }

    #[test]
    fn failure_replaces_previous_content() {
        let good = MockFetcher::new().with_json("academic.json", r#"[{"school":"A"}]"#);
        let mut container = Container::new("academic-list", 0.12);
        ContentRenderPipeline::new(&good)
            .render("academic.json", &mut container, "academic", academic_transform, templates::academic_item)
            .unwrap();
        assert_eq!(container.entry_count(), 1);

        let broken = MockFetcher::new().with_json("academic.json", "[{not json");
        let result = ContentRenderPipeline::new(&broken).render(
            "academic.json",
            &mut container,
            "academic",
            academic_transform,
            templates::academic_item,
        );
        assert!(matches!(result, Err(RenderError::Parse { .. })));
        assert_eq!(container.entry_count(), 0);
        assert!(container.error_message().is_some());
    }

    #[test]
    fn transport_failure_is_fetch_error() {
        let fetcher = MockFetcher::new().with_transport_error("skills.json");
        let pipeline = ContentRenderPipeline::new(&fetcher);
        let result = pipeline.fetch_json("skills.json");
        assert!(matches!(result, Err(RenderError::Fetch(_))));
    }

    #[test]
    fn escaped_output_never_contains_script_tag() {
        let fetcher = MockFetcher::new().with_json(
            "experience.json",
            r#"[{"company":"C","year":2020,"description":"<script>x</script>"}]"#,
        );
        let mut container = Container::new("timeline-items", 0.12);
        ContentRenderPipeline::new(&fetcher)
            .render("experience.json", &mut container, "experience", experience_transform, templates::experience_group)
            .unwrap();
        let html = container.render().into_string();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn stale_outcome_does_not_overwrite_newer_render() {
        let nl = MockFetcher::new().with_json("skills.json", r#"[{"name":"Oud","level":10}]"#);
        let en = MockFetcher::new().with_json("skills.json", r#"[{"name":"New","level":90}]"#);
        let transform = |v: Value| SkillsDocument::from_value(v).skills;
        let mut container = Container::new("skills-list", 0.3);

        let slow_ticket = container.begin();
        let slow = ContentRenderPipeline::new(&nl).prepare("skills.json", transform, templates::skill_bar);

        ContentRenderPipeline::new(&en)
            .render("skills.json", &mut container, "skills", transform, templates::skill_bar)
            .unwrap();

        let report = settle(&mut container, &slow_ticket, "skills", slow).unwrap();
        assert_eq!(report.status, CommitStatus::Stale);
        let html = container.render().into_string();
        assert!(html.contains("New"));
        assert!(!html.contains("Oud"));
    }

    #[test]
    fn wrong_shape_renders_empty_without_error() {
        let fetcher = MockFetcher::new().with_json("academic.json", r#"{"school":"A"}"#);
        let mut container = Container::new("academic-list", 0.12);
        let report = ContentRenderPipeline::new(&fetcher)
            .render("academic.json", &mut container, "academic", academic_transform, templates::academic_item)
            .unwrap();
        assert_eq!(report.entries, 0);
        assert!(container.error_message().is_none());
    }
}
