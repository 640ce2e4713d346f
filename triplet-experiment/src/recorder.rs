//! Maps a raw response onto the trial's items and scores it.

use tracing::warn;
use triplet_core::{Outcome, ResponseRecord, TrialDefinition, TrialRecord};

/// Derives the outcome of `response` against `definition`.
///
/// An out-of-range or non-button response leaves `selected_item` empty
/// rather than failing.
pub fn outcome(definition: &TrialDefinition, response: &ResponseRecord) -> Outcome {
    let chosen = response.chosen_index();
    let selected_item = chosen.and_then(|i| definition.items().get(i)).cloned();
    let correct_choice = definition
        .correct()
        .map(|correct| chosen == Some(correct));

    Outcome {
        selected_item,
        correct_choice,
    }
}

/// Appends the derived fields to `record` in place.
pub fn enrich(record: &mut TrialRecord, definition: &TrialDefinition) {
    let derived = outcome(definition, &record.response);

    if let Some(index) = record.response.chosen_index() {
        if derived.selected_item.is_none() {
            warn!(
                trial_index = record.response.trial_index,
                index,
                items = definition.items().len(),
                "response index out of range, selected item left empty"
            );
        }
    }

    attach(record, definition);
    record.outcome = derived;
}

/// Copies the definition's items and designated index onto the record.
pub fn attach(record: &mut TrialRecord, definition: &TrialDefinition) {
    record.response.items = Some(definition.items().to_vec());
    record.response.correct = definition.correct();
}
