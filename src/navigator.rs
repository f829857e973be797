//! Section navigation state machine.
//!
//! ```text
//!            navigate_to(id)                 navigate_to(other)
//!   Home ────────────────────► Section(id) ─────────────────────► Section(other)
//!    ▲                              │
//!    └──────── navigate_home() ─────┘
//! ```
//!
//! Transitions return the effects the caller must run. Entering a section that
//! shows fixture data yields exactly one render effect; entering or leaving
//! the skills section starts or resets the bar animation.

use crate::app::DataKind;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    About,
    Skills,
    Experience,
    Education,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 5] = [
        SectionId::About,
        SectionId::Skills,
        SectionId::Experience,
        SectionId::Education,
        SectionId::Contact,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionId::About => "about",
            SectionId::Skills => "skills",
            SectionId::Experience => "experience",
            SectionId::Education => "education",
            SectionId::Contact => "contact",
        }
    }

    /// The fixture this section shows, if any.
    pub fn data_kind(self) -> Option<DataKind> {
        match self {
            SectionId::Skills => Some(DataKind::Skills),
            SectionId::Experience => Some(DataKind::Experience),
            SectionId::Education => Some(DataKind::Academic),
            SectionId::About | SectionId::Contact => None,
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown section '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Home,
    Section(SectionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Render(DataKind),
    StartSkillAnimation,
    ResetSkillAnimation,
}

#[derive(Debug, Default)]
pub struct SectionNavigator {
    state: NavState,
}

impl SectionNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    /// Show section `id`. Re-selecting the current section does nothing.
    pub fn navigate_to(&mut self, id: SectionId) -> Vec<Effect> {
        let next = NavState::Section(id);
        if self.state == next {
            return Vec::new();
        }
        let mut effects = self.leave();
        if let Some(kind) = id.data_kind() {
            effects.push(Effect::Render(kind));
        }
        if id == SectionId::Skills {
            effects.push(Effect::StartSkillAnimation);
        }
        tracing::debug!(from = ?self.state, to = ?next, "navigate");
        self.state = next;
        effects
    }

    /// Return to the home view.
    pub fn navigate_home(&mut self) -> Vec<Effect> {
        if self.state == NavState::Home {
            return Vec::new();
        }
        let effects = self.leave();
        tracing::debug!(from = ?self.state, "navigate home");
        self.state = NavState::Home;
        effects
    }

    fn leave(&self) -> Vec<Effect> {
        match self.state {
            NavState::Section(SectionId::Skills) => vec![Effect::ResetSkillAnimation],
            _ => Vec::new(),
        }
    }
}
