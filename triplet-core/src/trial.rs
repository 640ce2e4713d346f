use serde::{Deserialize, Serialize};

use crate::{CoreError, Item, StandardPhase};

/// Presentation plugin that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrialType {
    HtmlButtonResponse,
    ImageButtonResponse,
    HtmlKeyboardResponse,
    SurveyText,
}

impl TrialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialType::HtmlButtonResponse => "html-button-response",
            TrialType::ImageButtonResponse => "image-button-response",
            TrialType::HtmlKeyboardResponse => "html-keyboard-response",
            TrialType::SurveyText => "survey-text",
        }
    }

    pub fn takes_buttons(&self) -> bool {
        matches!(
            self,
            TrialType::HtmlButtonResponse | TrialType::ImageButtonResponse
        )
    }
}

/// What the participant did: clicked a button, pressed a key or typed text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Button(usize),
    Key(String),
    Text { text: String },
}

impl Response {
    pub fn text(text: impl Into<String>) -> Self {
        Response::Text { text: text.into() }
    }
}

/// Static trial metadata authored before the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDefinition")]
pub struct TrialDefinition {
    items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    correct: Option<usize>,
}

#[derive(Deserialize)]
struct RawDefinition {
    items: Vec<Item>,
    #[serde(default)]
    correct: Option<usize>,
}

impl TryFrom<RawDefinition> for TrialDefinition {
    type Error = CoreError;

    fn try_from(raw: RawDefinition) -> Result<Self, Self::Error> {
        match raw.correct {
            Some(correct) => Self::with_correct(raw.items, correct),
            None => Self::new(raw.items),
        }
    }
}

impl TrialDefinition {
    pub fn new(items: Vec<Item>) -> Result<Self, CoreError> {
        if items.is_empty() {
            return Err(CoreError::EmptyTrial);
        }
        Ok(Self {
            items,
            correct: None,
        })
    }

    /// A trial with a designated odd item; `correct` must index into `items`.
    pub fn with_correct(items: Vec<Item>, correct: usize) -> Result<Self, CoreError> {
        let mut def = Self::new(items)?;
        if correct >= def.items.len() {
            return Err(CoreError::CorrectIndexOutOfRange {
                index: correct,
                len: def.items.len(),
            });
        }
        def.correct = Some(correct);
        Ok(def)
    }

    /// Single-item definition for screens that show one stimulus.
    pub fn from_stimulus(item: Item) -> Self {
        Self {
            items: vec![item],
            correct: None,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn correct(&self) -> Option<usize> {
        self.correct
    }
}

/// Raw per-trial outcome captured by the presentation runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub trial_index: usize,
    pub trial_type: TrialType,
    pub phase: StandardPhase,
    pub response: Option<Response>,
    /// Reaction time in milliseconds
    pub rt: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<usize>,
}

impl ResponseRecord {
    pub fn chosen_index(&self) -> Option<usize> {
        match self.response {
            Some(Response::Button(index)) => Some(index),
            _ => None,
        }
    }

    pub fn typed_text(&self) -> Option<&str> {
        match &self.response {
            Some(Response::Text { text }) => Some(text),
            _ => None,
        }
    }
}

/// Fields derived from a response by the outcome recorder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_item: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_choice: Option<bool>,
}

/// One entry of the run's record collection. Derived fields stay empty
/// until the screen's finish hook fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    #[serde(flatten)]
    pub response: ResponseRecord,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl TrialRecord {
    pub fn new(response: ResponseRecord) -> Self {
        Self {
            response,
            outcome: Outcome::default(),
        }
    }

    pub fn trial_type(&self) -> TrialType {
        self.response.trial_type
    }

    pub fn phase(&self) -> StandardPhase {
        self.response.phase
    }

    pub fn items(&self) -> &[Item] {
        self.response.items.as_deref().unwrap_or_default()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.outcome.selected_item.as_ref()
    }

    pub fn correct_choice(&self) -> Option<bool> {
        self.outcome.correct_choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(labels: &[&str]) -> Vec<Item> {
        labels.iter().map(|l| Item::text(*l)).collect()
    }

    #[test]
    fn correct_index_must_be_in_range() {
        let err = TrialDefinition::with_correct(words(&["a", "b", "c"]), 3).unwrap_err();
        assert_eq!(err, CoreError::CorrectIndexOutOfRange { index: 3, len: 3 });
        assert_eq!(TrialDefinition::new(vec![]).unwrap_err(), CoreError::EmptyTrial);
    }

    #[test]
    fn deserializing_checks_correct_index() {
        let err = serde_json::from_str::<TrialDefinition>(r#"{"items":["a","b","c"],"correct":9}"#)
            .unwrap_err();
        assert!(err.to_string().contains("correct index 9 out of range for 3 items"));
    }

    #[test]
    fn deserializing_rejects_empty_items() {
        let err = serde_json::from_str::<TrialDefinition>(r#"{"items":[]}"#).unwrap_err();
        assert!(err.to_string().contains("trial has no items"));
    }

    #[test]
    fn valid_definition_deserializes() {
        let def: TrialDefinition =
            serde_json::from_str(r#"{"items":["dog","cat","table"],"correct":2}"#).unwrap();
        assert_eq!(def, TrialDefinition::with_correct(words(&["dog", "cat", "table"]), 2).unwrap());

        let open: TrialDefinition = serde_json::from_str(r#"{"items":["img/img1.png"]}"#).unwrap();
        assert_eq!(open.correct(), None);
    }

    #[test]
    fn record_serializes_flat() {
        let mut record = TrialRecord::new(ResponseRecord {
            trial_index: 1,
            trial_type: TrialType::HtmlButtonResponse,
            phase: StandardPhase::Trials,
            response: Some(Response::Button(2)),
            rt: 915,
            items: Some(words(&["apple", "banana", "car"])),
            correct: Some(2),
        });
        record.outcome = Outcome {
            selected_item: Some(Item::text("car")),
            correct_choice: Some(true),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "trial_index": 1,
                "trial_type": "html-button-response",
                "phase": "trials",
                "response": 2,
                "rt": 915,
                "items": ["apple", "banana", "car"],
                "correct": 2,
                "selected_item": "car",
                "correct_choice": true,
            })
        );
    }

    #[test]
    fn unscored_record_round_trips_without_derived_fields() {
        let record = TrialRecord::new(ResponseRecord {
            trial_index: 0,
            trial_type: TrialType::HtmlKeyboardResponse,
            phase: StandardPhase::Instructions,
            response: Some(Response::Key(" ".into())),
            rt: 1200,
            items: None,
            correct: None,
        });
        assert_eq!(record.response.chosen_index(), None);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["response"], " ");
        assert!(value.get("items").is_none());
        assert!(value.get("selected_item").is_none());

        let back: TrialRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.outcome, Outcome::default());
    }

    #[test]
    fn text_response_serializes_as_object() {
        let response = Response::text("rough");
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"text":"rough"}"#);
        assert_eq!(serde_json::from_str::<Response>(&json).unwrap(), response);
        assert_eq!(serde_json::from_str::<Response>(r#""q""#).unwrap(), Response::Key("q".into()));
    }
}
