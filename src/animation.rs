//! Headline letter animation and skill-bar fill.
//!
//! Both run on the page [`Timeline`] instead of free-running timers:
//!
//! - **Headline**: the owner's name is split into one span per letter. Each
//!   cycle picks a random colour, paints letter *i* at `i * letter_step`,
//!   restores it `letter_hold` later, and schedules the next cycle at
//!   `len * cycle_step + cycle_pause`.
//! - **Skill bars**: entering the skills section schedules a single fill
//!   callback; leaving it bumps the channel (dropping a fill that has not run
//!   yet) and removes the fill class so the bars animate again next time.

use crate::config::AnimationConfig;
use crate::page::Page;
use crate::timeline::Timeline;
use maud::{Markup, html};
use rand::Rng;

/// Container id of the skill bars.
pub const SKILLS_CONTAINER: &str = "skills-list";

/// Class that lets the bars grow to their rendered width.
pub const BARS_FILLED_CLASS: &str = "bars-filled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Headline,
    SkillBars,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Paint { index: usize, color: String },
    Restore { index: usize },
    NextCycle,
    FillSkillBars,
}

pub type AnimationTimeline = Timeline<Channel, Action>;

#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub ch: char,
    pub color: Option<String>,
}

/// The animated headline, one entry per character.
#[derive(Debug, Clone, PartialEq)]
pub struct Headline {
    letters: Vec<Letter>,
}

impl Headline {
    pub fn new(text: &str) -> Self {
        Self {
            letters: text.chars().map(|ch| Letter { ch, color: None }).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn text(&self) -> String {
        self.letters.iter().map(|l| l.ch).collect()
    }

    fn paint(&mut self, index: usize, color: Option<String>) {
        if let Some(letter) = self.letters.get_mut(index) {
            letter.color = color;
        }
    }

    pub fn render(&self) -> Markup {
        html! {
            @for (i, letter) in self.letters.iter().enumerate() {
                span class={ "letter-" (i) " letter" }
                    style=[letter.color.as_ref().map(|c| format!("color: {c}"))] {
                    (letter.ch)
                }
            }
        }
    }
}

/// `rgb(r, g, b)` with every component in `55..=255`.
pub fn random_color<R: Rng>(rng: &mut R) -> String {
    let r = rng.gen_range(55..=255);
    let g = rng.gen_range(55..=255);
    let b = rng.gen_range(55..=255);
    format!("rgb({r}, {g}, {b})")
}

pub struct Animator {
    timing: AnimationConfig,
}

impl Animator {
    pub fn new(timing: AnimationConfig) -> Self {
        Self { timing }
    }

    /// Schedule the first headline cycle.
    pub fn start(&self, timeline: &mut AnimationTimeline) {
        timeline.bump(Channel::Headline);
        timeline.schedule(self.timing.start_delay_ms, Channel::Headline, Action::NextCycle);
    }

    /// Schedule one full colour cycle over `len` letters, plus the next cycle.
    pub fn schedule_cycle<R: Rng>(
        &self,
        timeline: &mut AnimationTimeline,
        len: usize,
        rng: &mut R,
    ) {
        if len == 0 {
            return;
        }
        let color = random_color(rng);
        for index in 0..len {
            let offset = (index as u64).saturating_mul(self.timing.letter_step_ms);
            timeline.schedule(
                offset,
                Channel::Headline,
                Action::Paint {
                    index,
                    color: color.clone(),
                },
            );
            timeline.schedule(
                offset.saturating_add(self.timing.letter_hold_ms),
                Channel::Headline,
                Action::Restore { index },
            );
        }
        // At least 1 ms, so a cycle never re-fires within the same instant.
        let next = (len as u64)
            .saturating_mul(self.timing.cycle_step_ms)
            .saturating_add(self.timing.cycle_pause_ms)
            .max(1);
        timeline.schedule(next, Channel::Headline, Action::NextCycle);
    }

    pub fn enter_skills(&self, timeline: &mut AnimationTimeline) {
        timeline.bump(Channel::SkillBars);
        timeline.schedule(
            self.timing.skill_bar_delay_ms,
            Channel::SkillBars,
            Action::FillSkillBars,
        );
    }

    pub fn leave_skills(&self, timeline: &mut AnimationTimeline, page: &mut Page) {
        timeline.bump(Channel::SkillBars);
        if let Some(container) = page.container_mut(SKILLS_CONTAINER) {
            container.remove_class(BARS_FILLED_CLASS);
        }
    }

    /// Apply a fired action to the page, scheduling follow-ups as needed.
    pub fn apply<R: Rng>(
        &self,
        action: Action,
        timeline: &mut AnimationTimeline,
        page: &mut Page,
        rng: &mut R,
    ) {
        match action {
            Action::Paint { index, color } => {
                if let Some(headline) = page.headline_mut() {
                    headline.paint(index, Some(color));
                }
            }
            Action::Restore { index } => {
                if let Some(headline) = page.headline_mut() {
                    headline.paint(index, None);
                }
            }
            Action::NextCycle => {
                let len = page.headline().map(Headline::len).unwrap_or(0);
                self.schedule_cycle(timeline, len, rng);
            }
            Action::FillSkillBars => {
                if let Some(container) = page.container_mut(SKILLS_CONTAINER) {
                    container.add_class(BARS_FILLED_CLASS);
                }
            }
        }
    }
}
