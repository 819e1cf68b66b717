use std::fmt::{self, Write};

use crate::model::PostRecord;

/// Polarity beyond ±0.1 counts as positive/negative.
const LABEL_THRESHOLD: f64 = 0.1;
const HISTOGRAM_BINS: usize = 20;
const BAR_WIDTH: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn classify(polarity: f64) -> Self {
        if polarity > LABEL_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < -LABEL_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    fn index(self) -> usize {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub mean: f64,
    /// Sample standard deviation; 0 for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Stats {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() > 1 {
            (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Stats { mean, std, min, max })
    }
}

/// Descriptive statistics over a scraped CSV.
#[derive(Debug, Clone)]
pub struct Summary {
    pub count: usize,
    pub polarity: Stats,
    pub subjectivity: Stats,
    /// Counts in [`SentimentLabel::ALL`] order.
    pub labels: [usize; 3],
    /// Polarity counts over [-1, 1] in equal-width bins.
    pub histogram: Vec<usize>,
}

impl Summary {
    pub fn from_records(records: &[PostRecord]) -> Option<Self> {
        let polarities: Vec<f64> = records.iter().map(|r| r.polarity).collect();
        let subjectivities: Vec<f64> = records.iter().map(|r| r.subjectivity).collect();

        let mut labels = [0usize; 3];
        for p in &polarities {
            labels[SentimentLabel::classify(*p).index()] += 1;
        }

        Some(Summary {
            count: records.len(),
            polarity: Stats::from_values(&polarities)?,
            subjectivity: Stats::from_values(&subjectivities)?,
            labels,
            histogram: histogram(&polarities, -1.0, 1.0, HISTOGRAM_BINS),
        })
    }

    pub fn label_count(&self, label: SentimentLabel) -> usize {
        self.labels[label.index()]
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Posts: {}", self.count);
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<13} | {:>7} | {:>7} | {:>7} | {:>7}",
            "", "mean", "std", "min", "max"
        );
        let _ = writeln!(out, "{}", "-".repeat(53));
        for (name, s) in [("polarity", &self.polarity), ("subjectivity", &self.subjectivity)] {
            let _ = writeln!(
                out,
                "{:<13} | {:>7.3} | {:>7.3} | {:>7.3} | {:>7.3}",
                name, s.mean, s.std, s.min, s.max
            );
        }

        let _ = writeln!(out, "\n--- Sentiment ---");
        for label in SentimentLabel::ALL {
            let _ = writeln!(out, "  {:<8} {:>5}", label, self.label_count(label));
        }

        let _ = writeln!(out, "\n--- Polarity distribution ---");
        let peak = self.histogram.iter().copied().max().unwrap_or(0).max(1);
        let width = 2.0 / self.histogram.len() as f64;
        for (i, count) in self.histogram.iter().enumerate() {
            let lo = -1.0 + i as f64 * width;
            let bar = "#".repeat(count * BAR_WIDTH / peak);
            let _ = writeln!(out, "  [{:>5.2}, {:>5.2}) {:>5} {}", lo, lo + width, count, bar);
        }
        out
    }
}

/// Equal-width bins over [lo, hi]; values at `hi` land in the last bin and
/// out-of-range values are clamped to the edge bins.
fn histogram(values: &[f64], lo: f64, hi: f64, bins: usize) -> Vec<usize> {
    let mut counts = vec![0; bins];
    if bins == 0 {
        return counts;
    }
    for v in values {
        let pos = ((v - lo) / (hi - lo) * bins as f64).floor();
        let idx = if pos < 0.0 { 0 } else { (pos as usize).min(bins - 1) };
        counts[idx] += 1;
    }
    counts
}
