//! Metrics logs hold one JSON-encoded `CombinedMetricsRecord` per line.

use anyhow::Context;
use echotrace_core::CombinedMetricsRecord;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub struct MetricsLog {
    path: PathBuf,
    writer: BufWriter<File>,
    records_written: usize,
}

impl MetricsLog {
    /// Creates (or truncates) the log at `path`.
    pub fn create(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("creating metrics log {}", path.display()))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            records_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn append(&mut self, record: &CombinedMetricsRecord) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        writeln!(self.writer)
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.records_written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.writer
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))
    }
}

/// Reads every record of a metrics log. Blank lines are skipped.
pub fn read_metrics_log(
    path: impl AsRef<Path>,
) -> anyhow::Result<Vec<CombinedMetricsRecord>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading metrics log {}", path.display()))?;
    let mut records = Vec::new();
    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).with_context(|| {
            format!("parsing {} line {}", path.display(), i + 1)
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn written_log_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.jsonl");
        let records = vec![
            CombinedMetricsRecord::new(10.0, 100.0, 20.0, 0.0),
            CombinedMetricsRecord::new(90.0, 1e7, 85.0, 0.7),
        ];
        let mut log = MetricsLog::create(&path).unwrap();
        for record in &records {
            log.append(record).unwrap();
        }
        log.flush().unwrap();
        assert_eq!(log.records_written(), 2);
        assert_eq!(read_metrics_log(&path).unwrap(), records);
    }

    #[test]
    fn malformed_line_reports_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.jsonl");
        let good = serde_json::to_string(&CombinedMetricsRecord::new(
            1.0, 2.0, 3.0, 0.1,
        ))
        .unwrap();
        fs::write(&path, format!("{}\n\n{{broken\n", good)).unwrap();
        let err = read_metrics_log(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }
}
