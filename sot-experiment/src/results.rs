//! Reduces the response log to summary scores and hands them to a sink.

use serde::{Deserialize, Serialize};
use sot_core::{Result, TrialResponse};
use tracing::{error, info};

const MAX_ERROR_DEG: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub avg_angular_error_deg: f64,
    pub avg_response_time_sec: f64,
    pub total_trials: usize,
    /// 0-100, where 100 means every answer was exact.
    pub accuracy_score: u32,
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

pub fn summarize(log: &[TrialResponse]) -> Summary {
    if log.is_empty() {
        return Summary::default();
    }
    let n = log.len() as f64;
    let mean_error = log.iter().map(|r| r.angular_error_deg).sum::<f64>() / n;
    let mean_time = log.iter().map(|r| r.response_time_sec).sum::<f64>() / n;
    let error_fraction = log
        .iter()
        .map(|r| r.angular_error_deg / MAX_ERROR_DEG)
        .sum::<f64>()
        / n;
    let accuracy = ((1.0 - error_fraction) * 100.0).round().clamp(0.0, 100.0);

    Summary {
        avg_angular_error_deg: round1(mean_error),
        avg_response_time_sec: round1(mean_time),
        total_trials: log.len(),
        accuracy_score: accuracy as u32,
    }
}

/// What a sink receives at the end of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(flatten)]
    pub summary: Summary,
    pub raw_log: Vec<TrialResponse>,
}

impl ResultRecord {
    pub fn new(raw_log: Vec<TrialResponse>) -> Self {
        Self {
            summary: summarize(&raw_log),
            raw_log,
        }
    }

    /// "error, time" line participants paste into the follow-up survey question.
    pub fn copy_line(&self) -> String {
        format!(
            "{:.1}, {:.1}",
            self.summary.avg_angular_error_deg, self.summary.avg_response_time_sec
        )
    }
}

/// Destination for final results.
pub trait ResultSink {
    fn send(&mut self, record: &ResultRecord) -> Result<()>;

    /// Tells the host the test has finished. Called once, after `send`.
    fn notify_completion(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ResultSink for Vec<Box<dyn ResultSink>> {
    fn send(&mut self, record: &ResultRecord) -> Result<()> {
        let mut first_err = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.send(record) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    fn notify_completion(&mut self) -> Result<()> {
        let mut first_err = None;
        for sink in self.iter_mut() {
            if let Err(e) = sink.notify_completion() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Runs the export at most once; later calls are no-ops.
#[derive(Debug)]
pub struct Exporter<K: ResultSink> {
    sink: K,
    record: Option<ResultRecord>,
}

impl<K: ResultSink> Exporter<K> {
    pub fn new(sink: K) -> Self {
        Self { sink, record: None }
    }

    /// Summarizes and delivers `log`. Sink failures are logged, never returned:
    /// the session reaches its completed state either way.
    pub fn export(&mut self, log: &[TrialResponse]) -> &ResultRecord {
        let record = match self.record.take() {
            Some(done) => done,
            None => {
                let record = ResultRecord::new(log.to_vec());
                info!(
                    trials = record.summary.total_trials,
                    avg_error = record.summary.avg_angular_error_deg,
                    avg_time = record.summary.avg_response_time_sec,
                    "exporting results"
                );
                if let Err(e) = self.sink.send(&record) {
                    error!("result export failed: {e}");
                }
                if let Err(e) = self.sink.notify_completion() {
                    error!("completion notice failed: {e}");
                }
                record
            }
        };
        self.record.insert(record)
    }

    pub fn record(&self) -> Option<&ResultRecord> {
        self.record.as_ref()
    }

    pub fn is_exported(&self) -> bool {
        self.record.is_some()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }
}
