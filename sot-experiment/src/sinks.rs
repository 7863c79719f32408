//! Concrete result sinks: survey host, standalone display, JSON file.

use crate::results::{ResultRecord, ResultSink};
use serde_json::{json, Value};
use sot_core::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

pub const COMPLETION_MESSAGE_TYPE: &str = "SOT_complete";

/// The parent survey engine: named key/value fields plus a message channel.
pub trait SurveyHost {
    fn set_embedded_data(&mut self, key: &str, value: &str) -> Result<()>;
    fn post_message(&mut self, message: &Value) -> Result<()>;
}

/// Host that writes one JSON object per line to any writer (stdout for a
/// launcher process, a buffer in tests).
#[derive(Debug)]
pub struct LineHost<W: Write> {
    out: W,
}

impl<W: Write> LineHost<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, value: &Value) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)
            .map_err(|e| Error::SinkUnavailable(e.to_string()))?;
        self.out
            .write_all(b"\n")
            .and_then(|_| self.out.flush())
            .map_err(|e| Error::SinkUnavailable(e.to_string()))
    }
}

impl<W: Write> SurveyHost for LineHost<W> {
    fn set_embedded_data(&mut self, key: &str, value: &str) -> Result<()> {
        self.write_line(&json!({ "kind": "embeddedData", "key": key, "value": value }))
    }

    fn post_message(&mut self, message: &Value) -> Result<()> {
        self.write_line(&json!({ "kind": "message", "data": message }))
    }
}

/// Relays results into survey embedded-data fields.
#[derive(Debug)]
pub struct SurveySink<H: SurveyHost> {
    host: H,
}

impl<H: SurveyHost> SurveySink<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

impl<H: SurveyHost> ResultSink for SurveySink<H> {
    fn send(&mut self, record: &ResultRecord) -> Result<()> {
        let s = &record.summary;
        let raw = serde_json::to_string(&record.raw_log)?;

        let h = &mut self.host;
        h.set_embedded_data("SOT_AverageError", &format!("{:.1}", s.avg_angular_error_deg))?;
        h.set_embedded_data(
            "SOT_AverageResponseTime",
            &format!("{:.2}", s.avg_response_time_sec),
        )?;
        h.set_embedded_data("SOT_AverageRT", &format!("{:.1}", s.avg_response_time_sec))?;
        h.set_embedded_data("SOT_AccuracyScore", &s.accuracy_score.to_string())?;
        h.set_embedded_data("SOT_TotalTrials", &s.total_trials.to_string())?;
        h.set_embedded_data("SOT_RawData", &raw)?;

        for (i, r) in record.raw_log.iter().enumerate() {
            let n = i + 1;
            h.set_embedded_data(&format!("SOT_Trial{n}_Error"), &r.angular_error_deg.to_string())?;
            h.set_embedded_data(&format!("SOT_Trial{n}_RT"), &r.response_time_sec.to_string())?;
            h.set_embedded_data(
                &format!("SOT_Trial{n}_ResponseAngle"),
                &r.response_angle_deg.to_string(),
            )?;
        }
        info!(trials = s.total_trials, "results sent to survey host");
        Ok(())
    }

    fn notify_completion(&mut self) -> Result<()> {
        self.host
            .post_message(&json!({ "type": COMPLETION_MESSAGE_TYPE }))
    }
}

/// Standalone runs: the results screen is the display, so this only logs.
#[derive(Debug, Default)]
pub struct StandaloneSink;

impl ResultSink for StandaloneSink {
    fn send(&mut self, record: &ResultRecord) -> Result<()> {
        info!(
            "average angular error {:.1}°, average response time {:.1}s (copy: {})",
            record.summary.avg_angular_error_deg,
            record.summary.avg_response_time_sec,
            record.copy_line()
        );
        Ok(())
    }
}

/// Writes the full record as pretty JSON.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonFileSink {
    fn send(&mut self, record: &ResultRecord) -> Result<()> {
        let file = std::fs::File::create(&self.path).map_err(|e| {
            warn!(path = %self.path.display(), "cannot create results file");
            Error::SinkUnavailable(e.to_string())
        })?;
        let mut out = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, record)
            .map_err(|e| Error::SinkUnavailable(e.to_string()))?;
        out.flush()
            .map_err(|e| Error::SinkUnavailable(e.to_string()))?;
        info!(path = %self.path.display(), "results saved");
        Ok(())
    }
}
