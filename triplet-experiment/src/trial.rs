use triplet_core::{Item, StandardPhase, TrialDefinition, TrialType};

/// Work done on a screen's record right after the participant responds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishHook {
    /// Resolve the chosen item and score it against the trial definition
    Score,
    /// Attach the described stimulus to a free-text answer
    Describe,
}

/// One timeline entry handed to the presenter
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub trial_type: TrialType,
    pub phase: StandardPhase,
    /// HTML shown above the choices
    pub stimulus: String,
    pub choices: Vec<Item>,
    pub definition: Option<TrialDefinition>,
    pub on_finish: Option<FinishHook>,
}

impl Screen {
    /// Instruction screen dismissed with any key
    pub fn keyboard(phase: StandardPhase, stimulus: impl Into<String>) -> Self {
        Self {
            trial_type: TrialType::HtmlKeyboardResponse,
            phase,
            stimulus: stimulus.into(),
            choices: Vec::new(),
            definition: None,
            on_finish: None,
        }
    }

    /// Instruction screen dismissed with a button
    pub fn button(phase: StandardPhase, stimulus: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            trial_type: TrialType::HtmlButtonResponse,
            phase,
            stimulus: stimulus.into(),
            choices: choices.iter().map(|c| Item::text(*c)).collect(),
            definition: None,
            on_finish: None,
        }
    }

    /// Scored odd-one-out trial; the choices are the definition's items.
    pub fn trial(
        trial_type: TrialType,
        stimulus: impl Into<String>,
        definition: TrialDefinition,
    ) -> Self {
        Self {
            trial_type,
            phase: StandardPhase::Trials,
            stimulus: stimulus.into(),
            choices: definition.items().to_vec(),
            definition: Some(definition),
            on_finish: Some(FinishHook::Score),
        }
    }

    /// Free-text screen asking for one word about `stimulus`
    pub fn descriptor(stimulus: Item, prompt: &str) -> Self {
        let html = format!(
            r#"<img src="{stimulus}" width="300"><p>{prompt}</p>"#
        );
        Self {
            trial_type: TrialType::SurveyText,
            phase: StandardPhase::Descriptor,
            stimulus: html,
            choices: Vec::new(),
            definition: Some(TrialDefinition::from_stimulus(stimulus)),
            on_finish: Some(FinishHook::Describe),
        }
    }

    pub fn with_phase(mut self, phase: StandardPhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn is_scored(&self) -> bool {
        self.on_finish == Some(FinishHook::Score)
    }
}
