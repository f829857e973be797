//! Markup for each data kind.
//!
//! Every template is a pure `&record -> Fragment`. Interpolation goes through
//! maud, which escapes text and attribute values, so fixture content can never
//! inject markup. Missing optional fields are empty strings by the time they
//! get here (see [`crate::types`]).

use crate::order::YearGroup;
use crate::page::{Fragment, FragmentTag};
use crate::types::{AcademicEntry, ExperienceEntry, SkillCategory, SkillEntry};
use maud::{Markup, html};

/// Bootstrap icon for an experience marker.
pub fn experience_icon(icon: Option<&str>) -> String {
    let class = match icon {
        Some("hammer") => "bi-hammer",
        Some("shop") => "bi-shop",
        Some("cash-coin") => "bi-cash-coin",
        Some("star") => "bi-star-fill",
        Some("egg-fried") => "bi-egg-fried",
        Some("terminal") => "bi-terminal",
        Some("telephone") => "bi-telephone",
        Some(other) if !other.is_empty() => return format!("bi-{other}"),
        _ => "bi-briefcase",
    };
    class.to_string()
}

/// Bootstrap icon for a skill chip on an experience entry.
pub fn skill_icon(icon: &str) -> String {
    let class = match icon {
        "headset" => "bi-headset",
        "users" => "bi-people-fill",
        "megaphone" => "bi-megaphone",
        "cash-coin" => "bi-cash-coin",
        "muscle" => "bi-activity",
        "party-popper" => "bi-balloon",
        "shoe-prints" => "bi-bag",
        "clock" => "bi-clock",
        "broom" => "bi-broom",
        "code" => "bi-code",
        "mobile" => "bi-phone",
        "lightbulb" => "bi-lightbulb",
        "gear" => "bi-gear",
        "check" => "bi-check",
        "" => "bi-circle",
        other => return format!("bi-{other}"),
    };
    class.to_string()
}

fn experience_entry(entry: &ExperienceEntry) -> Markup {
    html! {
        article.timeline-item.card.mb-4 {
            div.timeline-marker aria-hidden="true" {
                i class={ "bi " (experience_icon(entry.icon.as_deref())) } aria-hidden="true" {}
            }
            div.card-body.d-flex.flex-column.flex-md-row.gap-3 {
                div.job-content.flex-fill {
                    h3.h5.mb-1 { (entry.company) }
                    div.text-muted.small { (entry.start_date) " — " (entry.end_date) }
                    p.mb-1 { (entry.description) }
                }
                @if !entry.skills.is_empty() {
                    div.skills role="list" {
                        @for (label, icon) in &entry.skills {
                            button.skill type="button" role="listitem" aria-label=(label) data-skill=(label) aria-expanded="false" {
                                i class={ "bi " (skill_icon(icon)) } aria-hidden="true" {}
                                span.skill-tooltip { (label) }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// A year header followed by that year's entries.
pub fn experience_group(group: &YearGroup) -> Fragment {
    let year = group.year.map(|y| y.to_string()).unwrap_or_default();
    let class = match group.year {
        Some(y) => format!("timeline-year-group year-{y}"),
        None => "timeline-year-group".to_string(),
    };
    let body = html! {
        div.timeline-date {
            p { (year) }
        }
        div.timeline-entries {
            @for entry in &group.entries {
                (experience_entry(entry))
            }
        }
    };
    Fragment::new(FragmentTag::Div, class, body)
}

pub fn academic_item(entry: &AcademicEntry) -> Fragment {
    let body = html! {
        h4 {
            (entry.school)
            @if !entry.study.is_empty() {
                " — "
                small.text-muted { (entry.study) }
            }
        }
        div.meta { (entry.start_year.text) " — " (entry.end_year.text) }
        div.description { (entry.description) }
    };
    Fragment::new(FragmentTag::Div, "academic-item", body)
}

pub fn skill_bar(skill: &SkillEntry) -> Fragment {
    let level = skill.clamped_level();
    let body = html! {
        div.skill-name { (skill.name) }
        div.progress-bar-container role="progressbar" aria-label=(skill.name)
            aria-valuenow=(level) aria-valuemin="0" aria-valuemax="100" {
            div.progress-bar-fill style={ "width: " (level) "%" } {}
        }
    };
    Fragment::new(FragmentTag::Div, "skill-item", body)
}

pub fn skill_category(category: &SkillCategory) -> Fragment {
    let body = html! {
        h4.skill-category-title { (category.title) }
        div.skill-grid {
            @for item in &category.items {
                div.skill-card {
                    div.skill-icon {
                        i class=(item.icon) aria-hidden="true" {}
                    }
                    div.skill-name { (item.name) }
                }
            }
        }
    };
    Fragment::new(FragmentTag::Div, "skill-category", body)
}

/// Inline message shown in place of a container's content.
pub fn load_error_message(kind: &str) -> String {
    format!("Could not load {kind} data.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TechItem, YearValue};
    use serde_json::json;

    fn html_of(fragment: &Fragment) -> &str {
        fragment.body()
    }

    #[test]
    fn experience_icon_mapping_and_fallbacks() {
        assert_eq!(experience_icon(Some("star")), "bi-star-fill");
        assert_eq!(experience_icon(Some("rocket")), "bi-rocket");
        assert_eq!(experience_icon(None), "bi-briefcase");
        assert_eq!(experience_icon(Some("")), "bi-briefcase");
    }

    #[test]
    fn skill_icon_mapping_and_fallbacks() {
        assert_eq!(skill_icon("users"), "bi-people-fill");
        assert_eq!(skill_icon("tools"), "bi-tools");
        assert_eq!(skill_icon(""), "bi-circle");
    }

    #[test]
    fn description_is_escaped() {
        let group = YearGroup {
            year: Some(2024),
            entries: vec![ExperienceEntry {
                company: "Evil".to_string(),
                description: "<script>x</script>".to_string(),
                ..Default::default()
            }],
        };
        let fragment = experience_group(&group);
        assert!(html_of(&fragment).contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html_of(&fragment).contains("<script>"));
    }

    #[test]
    fn skill_labels_escaped_in_attributes() {
        let group = YearGroup {
            year: Some(2024),
            entries: vec![ExperienceEntry {
                company: "Shop".to_string(),
                skills: vec![(r#"a"b"#.to_string(), "check".to_string())],
                ..Default::default()
            }],
        };
        let html = experience_group(&group).body().to_string();
        assert!(html.contains("a&quot;b"));
        assert!(html.contains("bi-check"));
    }

    #[test]
    fn group_has_year_header_and_class() {
        let group = YearGroup {
            year: Some(2021),
            entries: vec![ExperienceEntry {
                company: "Acme".to_string(),
                ..Default::default()
            }],
        };
        let fragment = experience_group(&group);
        assert_eq!(fragment.class(), "timeline-year-group year-2021");
        assert!(fragment.body().contains("<p>2021</p>"));
        assert!(fragment.body().contains("Acme"));
    }

    #[test]
    fn missing_fields_render_empty_not_placeholder() {
        let group = YearGroup {
            year: Some(2020),
            entries: vec![ExperienceEntry {
                company: "Quiet".to_string(),
                ..Default::default()
            }],
        };
        let html = experience_group(&group).body().to_string();
        assert!(!html.contains("undefined"));
        assert!(!html.contains("None"));
        assert!(!html.contains(r#"class="skills""#));
    }

    #[test]
    fn academic_item_renders_years() {
        let entry = AcademicEntry {
            school: "Uni".to_string(),
            study: "CS".to_string(),
            start_year: YearValue::from_value(&json!(2020)),
            end_year: YearValue::from_value(&json!("2024")),
            description: String::new(),
        };
        let html = academic_item(&entry).body().to_string();
        assert!(html.contains("2020 — 2024"));
        assert!(html.contains(r#"<small class="text-muted">CS</small>"#));
    }

    #[test]
    fn skill_bar_width_is_clamped() {
        let skill = SkillEntry {
            name: "Go".to_string(),
            level: Some(130),
        };
        let html = skill_bar(&skill).body().to_string();
        assert!(html.contains("width: 100%"));
        assert!(html.contains(r#"aria-valuenow="100""#));
    }

    #[test]
    fn skill_category_lists_items() {
        let category = SkillCategory {
            title: "Languages".to_string(),
            items: vec![TechItem {
                name: "Rust".to_string(),
                icon: "devicon-rust-plain".to_string(),
            }],
        };
        let html = skill_category(&category).body().to_string();
        assert!(html.contains("Languages"));
        assert!(html.contains(r#"<i class="devicon-rust-plain""#));
    }

    #[test]
    fn error_message_names_kind() {
        assert_eq!(
            load_error_message("experience"),
            "Could not load experience data."
        );
    }
}
