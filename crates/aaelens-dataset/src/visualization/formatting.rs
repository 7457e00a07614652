//! Text rendering of histograms and label counts

use super::types::{Histogram, LabelDistribution};

fn bar(count: usize, max_count: usize, max_bar_width: usize) -> String {
    let length = if max_count > 0 {
        (count * max_bar_width) / max_count
    } else {
        0
    };
    "█".repeat(length)
}

impl Histogram {
    /// Display histogram as text-based bar chart
    pub fn display(&self, max_bar_width: usize) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Range: {:.4} to {:.4}\n",
            self.min_value, self.max_value
        ));
        output.push_str(&"─".repeat(50));
        output.push('\n');

        let max_count = self.bin_counts.iter().copied().max().unwrap_or(0);
        let edges = self.bin_edges();
        for (i, &count) in self.bin_counts.iter().enumerate() {
            let bar = bar(count, max_count, max_bar_width);
            output.push_str(&format!(
                "  Bin {i}: [{:>8.4}, {:>8.4}) {bar:<max_bar_width$} {count}\n",
                edges[i],
                edges[i + 1]
            ));
        }

        output
    }
}

impl LabelDistribution {
    /// One row per observed label, ascending
    pub fn display(&self, max_bar_width: usize) -> String {
        let mut output = format!("Label distribution ({} samples)\n", self.total());
        output.push_str(&"─".repeat(50));
        output.push('\n');

        let max_count = self.counts.values().copied().max().unwrap_or(0);
        for (label, &count) in &self.counts {
            let bar = bar(count, max_count, max_bar_width);
            output.push_str(&format!("  label {label}: {bar:<max_bar_width$} {count}\n"));
        }
        output
    }
}
