use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use triplet_experiment::{
    Experiment, ExperimentConfig, ExperimentKind, ExperimentStateMachine, ExportTarget,
    MemorySink, RecordSink, presets,
};
use triplet_export::{Download, RemoteSink, render_task_log};
use triplet_timing::MonotonicTimer;

use crate::terminal::TerminalPresenter;

/// How long to wait for the fire-and-forget POST before exiting
const SEND_GRACE: Duration = Duration::from_secs(5);

/// Triple odd-one-out experiments in the terminal
#[derive(Debug, Parser)]
#[command(name = "triplet", version)]
pub struct Cli {
    /// Experiment to run: words, images or textures
    #[arg(long)]
    pub experiment: Option<ExperimentKind>,

    /// Endpoint receiving the JSON results
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory for CSV output
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print the timeline as JSON and exit
    #[arg(long)]
    pub print_timeline: bool,
}

pub struct App {
    config: ExperimentConfig,
    experiment: Experiment,
    print_timeline: bool,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = ExperimentConfig::load()?;
        if let Some(kind) = cli.experiment {
            config.experiment = kind;
        }
        if cli.endpoint.is_some() {
            config.endpoint_url = cli.endpoint;
        }
        if let Some(dir) = cli.output_dir {
            config.output_dir = dir;
        }

        let experiment = presets::build(&config)?;
        Ok(Self {
            config,
            experiment,
            print_timeline: cli.print_timeline,
        })
    }

    pub async fn run(self) -> Result<()> {
        if self.print_timeline {
            println!("{}", serde_json_pretty(&self.experiment.timeline.to_json())?);
            return Ok(());
        }

        let pending = {
            let mut presenter =
                TerminalPresenter::new(std::io::stdin().lock(), std::io::stdout().lock());
            self.run_with(&mut presenter)?
        };

        if let Some(handle) = pending {
            if tokio::time::timeout(SEND_GRACE, handle).await.is_err() {
                warn!("results send still pending at exit");
            }
        }
        Ok(())
    }

    /// Runs the timeline and exports. Export problems are logged, never
    /// returned, so the closing message is always shown.
    pub fn run_with<R: BufRead, W: Write>(
        &self,
        presenter: &mut TerminalPresenter<R, W>,
    ) -> Result<Option<JoinHandle<()>>> {
        info!(experiment = ?self.experiment.kind, "starting");
        let machine = ExperimentStateMachine::new(
            self.experiment.timeline.clone(),
            MonotonicTimer::new(),
            MemorySink::new(),
        );

        let mut pending = None;
        machine.run(
            presenter,
            |sink: &MemorySink| pending = self.export(sink),
            self.experiment.closing_message.as_deref(),
        )?;
        Ok(pending)
    }

    fn export(&self, sink: &MemorySink) -> Option<JoinHandle<()>> {
        match self.experiment.export {
            ExportTarget::Remote => {
                let Some(url) = self.config.endpoint_url.as_deref() else {
                    warn!(records = sink.len(), "no endpoint_url configured, results not sent");
                    return None;
                };
                match RemoteSink::new(url).and_then(|remote| remote.send(sink.records())) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        error!(error = %e, "results not sent");
                        None
                    }
                }
            }
            ExportTarget::Download => {
                if let Err(e) = self.download().save(sink.records()) {
                    error!(error = %e, "failed to save data");
                }
                None
            }
            ExportTarget::TaskLog => {
                let log = render_task_log(sink.records());
                if let Err(e) = self.download().save_rendered(&log) {
                    error!(error = %e, "failed to save task log");
                }
                None
            }
        }
    }

    fn download(&self) -> Download {
        if self.config.unique_file_name {
            Download::unique(&self.config.output_dir, &self.config.file_name)
        } else {
            Download::new(&self.config.output_dir, self.config.file_name.as_str())
        }
    }
}

fn serde_json_pretty(value: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
