use serde::Serialize;
use triplet_core::{StandardPhase, Stimulus, TrialDefinition};

use crate::error::ExperimentError;
use crate::trial::Screen;

/// Ordered screens of one run. Phases never move backwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    screens: Vec<Screen>,
}

impl Timeline {
    pub fn new(screens: Vec<Screen>) -> Result<Self, ExperimentError> {
        for (index, screen) in screens.iter().enumerate() {
            if screen.is_scored() && screen.definition.is_none() {
                return Err(ExperimentError::MissingDefinition { index });
            }
        }
        for (index, pair) in screens.windows(2).enumerate() {
            if pair[1].phase < pair[0].phase {
                return Err(ExperimentError::PhaseOrder {
                    index: index + 1,
                    from: pair[0].phase,
                    to: pair[1].phase,
                });
            }
        }
        Ok(Self { screens })
    }

    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn trial_count(&self) -> usize {
        self.screens.iter().filter(|s| s.is_scored()).count()
    }

    pub fn scored_in_phase(&self, phase: StandardPhase) -> usize {
        self.screens
            .iter()
            .filter(|s| s.phase == phase && s.is_scored())
            .count()
    }

    /// Timeline in the trial-object shape a browser runner consumes.
    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<TimelineEntry<'_>> = self.screens.iter().map(TimelineEntry::from).collect();
        serde_json::json!(entries)
    }
}

#[derive(Serialize)]
struct TimelineEntry<'a> {
    #[serde(rename = "type")]
    trial_type: &'static str,
    stimulus: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    choices: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    button_html: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a TrialDefinition>,
}

impl<'a> From<&'a Screen> for TimelineEntry<'a> {
    fn from(screen: &'a Screen) -> Self {
        let button_html = if screen.choices.iter().any(|c| c.is_image()) {
            screen.choices.iter().map(|c| c.button_html()).collect()
        } else {
            Vec::new()
        };
        Self {
            trial_type: screen.trial_type.as_str(),
            stimulus: &screen.stimulus,
            choices: screen.choices.iter().map(|c| c.label()).collect(),
            button_html,
            data: screen.definition.as_ref(),
        }
    }
}
