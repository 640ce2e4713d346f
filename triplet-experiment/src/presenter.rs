use std::collections::VecDeque;
use std::time::Duration;

use triplet_core::Response;
use triplet_timing::ManualTimer;

use crate::error::ExperimentError;
use crate::trial::Screen;

/// The presentation runtime: shows one screen and waits for the participant.
pub trait Presenter {
    /// Blocks until the participant responds to `screen`.
    fn present(&mut self, screen: &Screen) -> Result<Option<Response>, ExperimentError>;

    /// Replaces the page with a closing message.
    fn finish(&mut self, message: &str) -> Result<(), ExperimentError>;
}

/// Replays canned responses, moving a shared [`ManualTimer`] by each
/// response's reaction time.
#[derive(Debug, Clone)]
pub struct ScriptedPresenter {
    timer: ManualTimer,
    steps: VecDeque<(Option<Response>, Duration)>,
    pub shown: Vec<Screen>,
    pub messages: Vec<String>,
}

impl ScriptedPresenter {
    pub fn new(timer: ManualTimer) -> Self {
        Self {
            timer,
            steps: VecDeque::new(),
            shown: Vec::new(),
            messages: Vec::new(),
        }
    }

    pub fn click(mut self, index: usize, rt_ms: u64) -> Self {
        self.steps
            .push_back((Some(Response::Button(index)), Duration::from_millis(rt_ms)));
        self
    }

    pub fn key(mut self, key: &str, rt_ms: u64) -> Self {
        self.steps
            .push_back((Some(Response::Key(key.to_string())), Duration::from_millis(rt_ms)));
        self
    }

    pub fn text(mut self, text: &str, rt_ms: u64) -> Self {
        self.steps
            .push_back((Some(Response::text(text)), Duration::from_millis(rt_ms)));
        self
    }
}

impl Presenter for ScriptedPresenter {
    fn present(&mut self, screen: &Screen) -> Result<Option<Response>, ExperimentError> {
        let index = self.shown.len();
        let (response, rt) = self
            .steps
            .pop_front()
            .ok_or(ExperimentError::ScriptExhausted { index })?;
        self.timer.advance(rt);
        self.shown.push(screen.clone());
        Ok(response)
    }

    fn finish(&mut self, message: &str) -> Result<(), ExperimentError> {
        self.messages.push(message.to_string());
        Ok(())
    }
}
