//! Background Jobs
//! Runs one tool operation off the UI thread and streams its log lines
//! back over a channel that the panel drains every frame.

use dts_toolkit::kpi::CoverageReport;
use egui::Color32;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// What a finished job hands back to its panel.
pub enum JobOutcome {
    /// Plain success (or partial-failure) summary.
    Done { message: String, ok: bool },
    /// Coverage run with its report and the workbook written.
    Coverage {
        report: CoverageReport,
        output: PathBuf,
    },
}

/// Message from the worker thread
enum JobEvent {
    Log(String),
    Finished(Result<JobOutcome, String>),
}

/// Status line under each panel's log.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Status {
    #[default]
    Ready,
    Running,
    Success(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Ready => "Ready",
            Status::Running => "Working...",
            Status::Success(msg) | Status::Error(msg) => msg,
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Status::Error(_) => Color32::from_rgb(220, 53, 69),
            Status::Success(_) => Color32::from_rgb(40, 167, 69),
            Status::Running => Color32::from_rgb(100, 149, 237),
            Status::Ready => Color32::GRAY,
        }
    }
}

/// One job at a time plus its accumulated log.
#[derive(Default)]
pub struct JobSlot {
    rx: Option<Receiver<JobEvent>>,
    pub log: Vec<String>,
    pub status: Status,
}

impl JobSlot {
    pub fn is_running(&self) -> bool {
        self.rx.is_some()
    }

    /// Start `work` on a new thread. Ignored while a job is running.
    pub fn spawn<F>(&mut self, work: F)
    where
        F: FnOnce(&mut dyn FnMut(&str)) -> Result<JobOutcome, String> + Send + 'static,
    {
        if self.is_running() {
            return;
        }

        let (tx, rx) = channel();
        self.rx = Some(rx);
        self.log.clear();
        self.status = Status::Running;

        thread::spawn(move || {
            let log_tx = tx.clone();
            let mut log = move |line: &str| {
                let _ = log_tx.send(JobEvent::Log(line.to_string()));
            };
            let result = work(&mut log);
            let _ = tx.send(JobEvent::Finished(result));
        });
    }

    /// Drain pending events. Returns the outcome once the job finishes.
    pub fn poll(&mut self) -> Option<JobOutcome> {
        let rx = self.rx.take()?;
        let mut finished = None;

        loop {
            match rx.try_recv() {
                Ok(JobEvent::Log(line)) => self.log.push(line),
                Ok(JobEvent::Finished(result)) => {
                    finished = Some(result);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    finished = Some(Err("Background job stopped unexpectedly".to_string()));
                    break;
                }
            }
        }

        match finished {
            None => {
                self.rx = Some(rx);
                None
            }
            Some(Ok(outcome)) => {
                self.status = match &outcome {
                    JobOutcome::Done { message, ok: true } => Status::Success(message.clone()),
                    JobOutcome::Done { message, ok: false } => Status::Error(message.clone()),
                    JobOutcome::Coverage { report, .. } if !report.warnings.is_empty() => {
                        Status::Error(format!(
                            "Completed with {} file error(s)",
                            report.warnings.len()
                        ))
                    }
                    JobOutcome::Coverage { .. } => Status::Success("Analysis completed".into()),
                };
                Some(outcome)
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Job failed");
                self.log.push(format!("Error: {e}"));
                self.status = Status::Error(e);
                None
            }
        }
    }

    pub fn reset(&mut self) {
        if !self.is_running() {
            self.log.clear();
            self.status = Status::Ready;
        }
    }
}
