use echotrace_core::CombinedMetricsRecord;

pub const BAR_WIDTH: usize = 10;

/// A bar of `width` cells, filled in proportion to `value / max_value`. Out of range values are
/// clamped.
pub fn bar(value: f64, max_value: f64, width: usize) -> String {
    let fraction = if max_value > 0.0 && value.is_finite() {
        (value / max_value).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * width as f64) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn status_line(sample_count: u64, record: &CombinedMetricsRecord) -> String {
    format!(
        "samples: {:4} | cpu: {:5.1}% {} | mem: {:5.1}% {} | net: {:6.2}MB/s | anomaly: {:.2} {}",
        sample_count,
        record.cpu_percent,
        bar(record.cpu_percent, 100.0, BAR_WIDTH),
        record.memory_percent,
        bar(record.memory_percent, 100.0, BAR_WIDTH),
        record.network_rate / 1_000_000.0,
        record.anomaly_score,
        bar(record.anomaly_score, 1.0, BAR_WIDTH),
    )
}
