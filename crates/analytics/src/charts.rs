//! Chart Primitives

use serde::Serialize;
use std::collections::HashMap;

/// Occurrence counts of categorical values, most frequent first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueCounts {
    entries: Vec<(String, usize)>,
}

impl ValueCounts {
    /// Count values; ties are ordered by label
    pub fn tally<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in values {
            *counts.entry(value.into()).or_default() += 1;
        }

        let mut entries: Vec<_> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, count)| *count).collect()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A single Plotly trace
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie { labels: Vec<String>, values: Vec<usize> },
    Histogram { x: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
}

/// Plotly figure: `{"data": [...], "layout": {"title": {"text": ...}}}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    fn titled(trace: Trace, title: &str) -> Self {
        Self {
            data: vec![trace],
            layout: Layout {
                title: Title {
                    text: title.to_string(),
                },
            },
        }
    }

    /// Pie chart of value counts
    pub fn pie(counts: &ValueCounts, title: &str) -> Self {
        Self::titled(
            Trace::Pie {
                labels: counts.labels(),
                values: counts.counts(),
            },
            title,
        )
    }

    /// Histogram of raw values; binning is left to the renderer
    pub fn histogram(values: Vec<f64>, title: &str) -> Self {
        Self::titled(Trace::Histogram { x: values }, title)
    }

    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}
