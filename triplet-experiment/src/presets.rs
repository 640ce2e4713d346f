//! The bundled triple odd-one-out experiments.

use triplet_core::{Item, StandardPhase, TrialDefinition, TrialType};

use crate::config::{ExperimentConfig, ExperimentKind};
use crate::error::ExperimentError;
use crate::timeline::Timeline;
use crate::trial::Screen;

/// Where a finished run's records go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportTarget {
    /// Fire-and-forget POST of every record
    Remote,
    /// CSV of the image trials, saved as a file
    Download,
    /// One CSV holding triple and descriptor rows, told apart by a `task` column
    TaskLog,
}

#[derive(Debug, Clone)]
pub struct Experiment {
    pub kind: ExperimentKind,
    pub timeline: Timeline,
    pub export: ExportTarget,
    /// Shown after export; `None` when the timeline ends on its own thank-you screen
    pub closing_message: Option<String>,
}

pub fn build(config: &ExperimentConfig) -> Result<Experiment, ExperimentError> {
    match config.experiment {
        ExperimentKind::Words => words(&config.thank_you),
        ExperimentKind::Images => images(&config.thank_you),
        ExperimentKind::Textures => textures(config),
    }
}

const WORD_TRIALS: [[&str; 3]; 4] = [
    ["apple", "banana", "car"],
    ["dog", "cat", "table"],
    ["red", "blue", "chair"],
    ["pencil", "eraser", "dog"],
];

pub fn words(thank_you: &str) -> Result<Experiment, ExperimentError> {
    let mut screens = vec![Screen::button(
        StandardPhase::Instructions,
        "<p>Welcome!<br>For each set of three items, click the one that doesn't fit.</p>",
        &["Start"],
    )];
    for labels in WORD_TRIALS {
        let items = labels.iter().map(|l| Item::text(*l)).collect();
        let definition = TrialDefinition::with_correct(items, 2)?;
        screens.push(Screen::trial(
            TrialType::HtmlButtonResponse,
            "<p>Click the item that doesn't fit:</p>",
            definition,
        ));
    }

    Ok(Experiment {
        kind: ExperimentKind::Words,
        timeline: Timeline::new(screens)?,
        export: ExportTarget::Remote,
        closing_message: Some(thank_you.to_string()),
    })
}

const IMAGE_TRIALS: [[u32; 3]; 5] = [[1, 2, 3], [4, 5, 6], [7, 8, 9], [10, 11, 12], [1, 12, 13]];

fn image_path(n: u32) -> String {
    format!("img/img{n}.png")
}

fn image_triple(triple: &[u32; 3]) -> Result<TrialDefinition, ExperimentError> {
    let items = triple.iter().map(|n| Item::image(image_path(*n))).collect();
    Ok(TrialDefinition::new(items)?)
}

pub fn images(thank_you: &str) -> Result<Experiment, ExperimentError> {
    let example: String = [1, 2, 3]
        .iter()
        .map(|n| format!("<img src='{}' width='150'>", image_path(*n)))
        .collect();

    let mut screens = vec![
        Screen::keyboard(
            StandardPhase::Instructions,
            "<h2>Welcome to the Triple Odd-One-Out Experiment</h2>\
             <p>In this experiment, you will see sets of three images.</p>\
             <p>Your task is to choose the image that does not fit with the other two.</p>\
             <p>Press any key to continue.</p>",
        ),
        Screen::keyboard(
            StandardPhase::Instructions,
            format!(
                "<p>Here is an example:</p>\
                 <div style='display:flex; justify-content:space-around;'>{example}</div>\
                 <p>Click the image that is different from the other two.</p>\
                 <p>Press any key to start the experiment.</p>"
            ),
        ),
    ];
    for triple in &IMAGE_TRIALS {
        screens.push(Screen::trial(
            TrialType::ImageButtonResponse,
            "<div style='margin-bottom:10px;'>Click the image that does not fit with the other two:</div>",
            image_triple(triple)?,
        ));
    }
    screens.push(Screen::keyboard(
        StandardPhase::Debrief,
        format!("<p>{thank_you}</p><p>Press any key to download your data.</p>"),
    ));

    Ok(Experiment {
        kind: ExperimentKind::Images,
        timeline: Timeline::new(screens)?,
        export: ExportTarget::Download,
        closing_message: None,
    })
}

/// Each main triple is shown this many times
const TEXTURE_REPEATS: usize = 2;
/// A rest screen precedes every block whose zero-based number is a
/// non-zero multiple of this
const BREAK_EVERY: usize = 2;

/// Every 3-combination of `1..=n` in lexicographic order
pub fn triples(n: u32) -> Vec<[u32; 3]> {
    let mut out = Vec::new();
    for a in 1..=n {
        for b in a + 1..=n {
            for c in b + 1..=n {
                out.push([a, b, c]);
            }
        }
    }
    out
}

pub fn textures(config: &ExperimentConfig) -> Result<Experiment, ExperimentError> {
    if config.stimulus_count < 3 {
        return Err(ExperimentError::Layout(format!(
            "need at least 3 stimuli, got {}",
            config.stimulus_count
        )));
    }
    if config.block_size == 0 {
        return Err(ExperimentError::Layout("block_size must be positive".into()));
    }

    let combos = triples(config.stimulus_count);
    let practice = &combos[..config.practice_trials.min(combos.len())];

    let mut screens = vec![
        Screen::keyboard(
            StandardPhase::Instructions,
            "<p>Welcome!</p>\
             <p>This experiment entails two tasks.</p>\
             <p>The first task does not take longer than 20 min.</p>\
             <p>The second task does not take longer than 5 min.</p>\
             <p>Press any key to start.</p>",
        ),
        Screen::keyboard(
            StandardPhase::Instructions,
            format!(
                "<h2>Task 1</h2>\
                 <p>At each trial, three images appear. Click on the image that is most different from the other two.</p>\
                 <p>Before the main task, you will complete {} training trials.</p>\
                 <p>Press any key to start the training.</p>",
                practice.len()
            ),
        ),
    ];

    for triple in practice {
        screens.push(
            Screen::trial(
                TrialType::ImageButtonResponse,
                "<p>Practice: Click on the texture that is most different from the other two.</p>",
                image_triple(triple)?,
            )
            .with_phase(StandardPhase::Practice),
        );
    }
    if !practice.is_empty() {
        screens.push(Screen::keyboard(
            StandardPhase::Practice,
            "<h2>Task 1</h2>\
             <p>Thank you for doing the training. Now it is time to do the main task.</p>\
             <p>Press any key to begin.</p>",
        ));
    }

    let main: Vec<[u32; 3]> = std::iter::repeat_n(combos.iter().copied(), TEXTURE_REPEATS)
        .flatten()
        .collect();
    for (block, trials) in main.chunks(config.block_size).enumerate() {
        if block != 0 && block % BREAK_EVERY == 0 {
            screens.push(Screen::keyboard(
                StandardPhase::Trials,
                "<h2>Take a break</h2>\
                 <p>Take a couple of minutes to rest if needed.</p>\
                 <p>Press any key when you are ready to continue.</p>",
            ));
        }
        screens.push(Screen::keyboard(
            StandardPhase::Trials,
            format!("<p>Press any key to start Block {}.</p>", block + 1),
        ));
        for triple in trials {
            screens.push(Screen::trial(
                TrialType::ImageButtonResponse,
                "<p>Click on the texture that is most different from the other two.</p>",
                image_triple(triple)?,
            ));
        }
    }
    screens.push(Screen::keyboard(
        StandardPhase::Trials,
        "<p>Thank you! Task 1 is completed.</p><p>Press any key to start task 2.</p>",
    ));

    screens.push(Screen::keyboard(
        StandardPhase::Descriptor,
        "<h2>Task 2</h2>\
         <p>For each image, describe the texture in one word.</p>\
         <p>Press any key to start.</p>",
    ));
    for n in 1..=config.stimulus_count {
        screens.push(Screen::descriptor(
            Item::image(image_path(n)),
            "Type a word that describes this texture. Press Enter when done.",
        ));
    }

    Ok(Experiment {
        kind: ExperimentKind::Textures,
        timeline: Timeline::new(screens)?,
        export: ExportTarget::TaskLog,
        closing_message: Some(config.thank_you.clone()),
    })
}
