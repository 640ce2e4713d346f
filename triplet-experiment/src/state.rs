use tracing::{debug, info};
use triplet_core::{Phase, ResponseRecord, StandardPhase, TrialRecord};
use triplet_timing::Timer;

use crate::error::ExperimentError;
use crate::presenter::Presenter;
use crate::recorder;
use crate::sink::RecordSink;
use crate::timeline::Timeline;
use crate::trial::FinishHook;

/// Drives a timeline screen by screen, recording one response per screen.
pub struct ExperimentStateMachine<T, K>
where
    T: Timer,
    K: RecordSink,
{
    phase: StandardPhase,
    timer: T,
    timeline: Timeline,
    sink: K,
    trial_number: usize,
    phase_trial_number: usize,
}

impl<T, K> ExperimentStateMachine<T, K>
where
    T: Timer,
    K: RecordSink,
{
    pub fn new(timeline: Timeline, timer: T, sink: K) -> Self {
        Self {
            phase: StandardPhase::default(),
            timer,
            timeline,
            sink,
            trial_number: 0,
            phase_trial_number: 0,
        }
    }

    fn advance_phase(&mut self, target: StandardPhase) {
        while self.phase != target {
            match self.phase.next() {
                Some(next) => {
                    info!(from = ?self.phase, to = ?next, "phase advanced");
                    self.phase = next;
                    self.phase_trial_number = 0;
                }
                None => break,
            }
        }
    }

    /// Presents the next screen and stores its record.
    /// Returns `false` once the timeline is exhausted.
    pub fn step<P: Presenter>(&mut self, presenter: &mut P) -> Result<bool, ExperimentError> {
        let index = self.trial_number;
        let Some(target) = self.timeline.screens().get(index).map(|s| s.phase) else {
            return Ok(false);
        };
        self.advance_phase(target);

        let screen = &self.timeline.screens()[index];
        let started = self.timer.now();
        let response = presenter.present(screen)?;
        let rt = self.timer.elapsed_ms(started);

        self.sink.push(TrialRecord::new(ResponseRecord {
            trial_index: index,
            trial_type: screen.trial_type,
            phase: screen.phase,
            response,
            rt,
            items: None,
            correct: None,
        }));

        let hook = screen.on_finish.zip(screen.definition.as_ref());
        match (hook, self.sink.last_mut()) {
            (Some((FinishHook::Score, definition)), Some(record)) => {
                recorder::enrich(record, definition);
                let selected = record.selected_item().cloned();
                let correct = record.correct_choice();
                self.phase_trial_number += 1;
                debug!(
                    trial_index = index,
                    rt,
                    selected = ?selected,
                    correct = ?correct,
                    progress = ?self.trial_progress(),
                    "trial finished"
                );
            }
            (Some((FinishHook::Describe, definition)), Some(record)) => {
                recorder::attach(record, definition);
                debug!(trial_index = index, rt, text = ?record.response.typed_text(), "description recorded");
            }
            _ => debug!(trial_index = index, rt, "screen finished"),
        }

        self.trial_number += 1;
        Ok(true)
    }

    /// Runs every remaining screen, then hands the records to `on_complete`
    /// exactly once and shows the closing message, if any.
    pub fn run<P, F>(
        mut self,
        presenter: &mut P,
        on_complete: F,
        closing_message: Option<&str>,
    ) -> Result<K, ExperimentError>
    where
        P: Presenter,
        F: FnOnce(&K),
    {
        info!(screens = self.timeline.len(), trials = self.timeline.trial_count(), "run started");
        while self.step(presenter)? {}

        info!(records = self.sink.len(), "run complete");
        on_complete(&self.sink);

        if let Some(message) = closing_message {
            presenter.finish(message)?;
        }
        Ok(self.sink)
    }

    /// (scored trials done, scored trials total) within the practice or
    /// main trial phase
    pub fn trial_progress(&self) -> Option<(usize, usize)> {
        if self.phase.is_trial() || self.phase.is_practice() {
            Some((
                self.phase_trial_number,
                self.timeline.scored_in_phase(self.phase),
            ))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentConfig;
    use crate::presenter::ScriptedPresenter;
    use crate::presets;
    use crate::sink::MemorySink;
    use pretty_assertions::assert_eq;
    use triplet_core::{Item, Outcome, Response, TrialType};
    use triplet_timing::ManualTimer;

    #[test]
    fn words_run_scores_each_trial() {
        let exp = presets::words("Thanks").unwrap();
        let timer = ManualTimer::new();
        let mut presenter = ScriptedPresenter::new(timer.clone())
            .click(0, 1500)
            .click(2, 900)
            .click(0, 1100)
            .click(2, 700)
            .click(1, 650);

        let machine = ExperimentStateMachine::new(exp.timeline, timer, MemorySink::new());
        let mut completed = 0;
        let sink = machine
            .run(&mut presenter, |_| completed += 1, exp.closing_message.as_deref())
            .unwrap();

        assert_eq!(completed, 1);
        assert_eq!(presenter.messages, ["Thanks"]);

        let records = sink.records();
        assert_eq!(records.len(), 5);
        assert_eq!(records[0].outcome, Outcome::default());
        assert_eq!(records[0].phase(), StandardPhase::Instructions);
        assert_eq!(records[0].response.rt, 1500);

        let scores: Vec<Option<bool>> = records[1..].iter().map(|r| r.correct_choice()).collect();
        assert_eq!(scores, [Some(true), Some(false), Some(true), Some(false)]);
        assert_eq!(records[1].selected_item(), Some(&Item::text("car")));
        assert_eq!(records[2].selected_item(), Some(&Item::text("dog")));
        assert_eq!(records[4].response.rt, 650);
    }

    #[test]
    fn images_completion_runs_after_end_screen() {
        let exp = presets::images("Thank you for participating!").unwrap();
        let timer = ManualTimer::new();
        let mut presenter = ScriptedPresenter::new(timer.clone())
            .key(" ", 2000)
            .key("a", 1800)
            .click(1, 842)
            .click(0, 700)
            .click(2, 910)
            .click(1, 605)
            .click(0, 1220)
            .key("x", 300);

        let machine = ExperimentStateMachine::new(exp.timeline, timer, MemorySink::new());
        let mut seen_at_completion = None;
        let sink = machine
            .run(
                &mut presenter,
                |sink: &MemorySink| {
                    seen_at_completion = sink.records().last().map(|r| r.phase());
                },
                None,
            )
            .unwrap();

        assert_eq!(seen_at_completion, Some(StandardPhase::Debrief));
        let records = sink.records();
        assert_eq!(records.len(), 8);
        assert!(presenter.messages.is_empty());
        assert_eq!(records[2].trial_type(), TrialType::ImageButtonResponse);
        assert_eq!(records[2].selected_item(), Some(&Item::image("img/img2.png")));
        assert_eq!(records[2].response.rt, 842);
        assert_eq!(records[7].response.response, Some(Response::Key("x".into())));
        assert!(records[2..7].iter().all(|r| r.correct_choice().is_none()));
    }

    #[test]
    fn progress_counts_scored_screens_per_phase() {
        let config = ExperimentConfig {
            stimulus_count: 4,
            block_size: 2,
            practice_trials: 2,
            ..ExperimentConfig::default()
        };
        let exp = presets::textures(&config).unwrap();
        let timer = ManualTimer::new();
        // welcome, task 1 instructions, two practice trials
        let mut presenter = ScriptedPresenter::new(timer.clone())
            .key(" ", 10)
            .key(" ", 10)
            .click(0, 10)
            .click(1, 10);
        let mut machine = ExperimentStateMachine::new(exp.timeline, timer, MemorySink::new());

        assert_eq!(machine.trial_progress(), None);
        machine.step(&mut presenter).unwrap();
        machine.step(&mut presenter).unwrap();
        assert_eq!(machine.trial_progress(), None);
        machine.step(&mut presenter).unwrap();
        assert_eq!(machine.phase, StandardPhase::Practice);
        assert_eq!(machine.trial_progress(), Some((1, 2)));
        machine.step(&mut presenter).unwrap();
        assert_eq!(machine.trial_progress(), Some((2, 2)));
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let exp = presets::words("bye").unwrap();
        let timer = ManualTimer::new();
        let mut presenter = ScriptedPresenter::new(timer.clone()).click(0, 10);
        let machine = ExperimentStateMachine::new(exp.timeline, timer, MemorySink::new());
        let err = machine.run(&mut presenter, |_| {}, None).err().unwrap();
        assert!(matches!(err, ExperimentError::ScriptExhausted { index: 1 }));
    }
}
