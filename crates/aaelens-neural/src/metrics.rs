//! Clustering metrics for unsupervised label assignment
//!
//! The encoder's categorical head learns cluster ids that carry no fixed
//! relation to the true digit labels. Accuracy is therefore measured after
//! mapping every predicted id to the true label it co-occurs with most.

use crate::model::QNet;
use aaelens_core::{Result, Tensor, TensorError};
use std::collections::BTreeMap;
use std::fmt;

/// Most probable cluster id for every row of `x`
pub fn predict_labels(q: &QNet, x: &Tensor<f32>) -> Result<Vec<usize>> {
    q.predict(x)
}

/// Co-occurrence counts between true labels and predicted cluster ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContingencyTable {
    /// true label -> predicted id -> count
    pub true_to_pred: BTreeMap<usize, BTreeMap<usize, usize>>,
    /// predicted id -> true label -> count
    pub pred_to_true: BTreeMap<usize, BTreeMap<usize, usize>>,
}

impl ContingencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, y_true: usize, y_hat: usize) {
        *self
            .true_to_pred
            .entry(y_true)
            .or_default()
            .entry(y_hat)
            .or_default() += 1;
        *self
            .pred_to_true
            .entry(y_hat)
            .or_default()
            .entry(y_true)
            .or_default() += 1;
    }

    /// Record a batch of pairs; both slices must have the same length
    pub fn record_batch(&mut self, y_true: &[usize], y_hat: &[usize]) -> Result<()> {
        if y_true.len() != y_hat.len() {
            return Err(TensorError::shape_mismatch(
                "ContingencyTable::record_batch",
                &format!("{} predictions", y_true.len()),
                &format!("{} predictions", y_hat.len()),
            ));
        }
        for (&t, &p) in y_true.iter().zip(y_hat) {
            self.record(t, p);
        }
        Ok(())
    }

    pub fn total(&self) -> usize {
        self.true_to_pred.values().flat_map(|m| m.values()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.true_to_pred.is_empty()
    }
}

impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, preds) in &self.true_to_pred {
            let cells: Vec<String> = preds.iter().map(|(p, c)| format!("{p}: {c}")).collect();
            writeln!(f, "{label}: {{{}}}", cells.join(", "))?;
        }
        Ok(())
    }
}

/// Best matching cluster for one true label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMatch {
    pub true_label: usize,
    pub samples: usize,
    pub best_prediction: usize,
    /// Share of this label's samples assigned to `best_prediction`, in percent
    pub percentage: f64,
}

/// Outcome of [`cluster_accuracy`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterAccuracy {
    pub per_label: Vec<LabelMatch>,
    /// predicted id -> true label chosen by majority vote
    pub label_mapping: BTreeMap<usize, usize>,
    pub never_predicted: Vec<usize>,
    pub correct: usize,
    pub wrong: usize,
}

impl ClusterAccuracy {
    /// `correct / (correct + wrong)`, or `0.0` without samples
    pub fn accuracy(&self) -> f64 {
        let total = self.correct + self.wrong;
        if total == 0 {
            return 0.0;
        }
        self.correct as f64 / total as f64
    }

    pub fn percentage(&self) -> f64 {
        self.accuracy() * 100.0
    }

    /// Multi-line text report of the score and the mapping
    pub fn report(&self) -> String {
        let mut out = String::new();
        for m in &self.per_label {
            out.push_str(&format!(
                "true label {} ({} samples): best match {} ({:.2}%)\n",
                m.true_label, m.samples, m.best_prediction, m.percentage
            ));
        }
        for id in &self.never_predicted {
            out.push_str(&format!("predicted label {id} was never assigned\n"));
        }
        out.push_str(&format!(
            "accuracy: {:.2}% ({} correct, {} wrong)\n",
            self.percentage(),
            self.correct,
            self.wrong
        ));
        let mapping: Vec<String> = self
            .label_mapping
            .iter()
            .map(|(p, t)| format!("{p} -> {t}"))
            .collect();
        out.push_str(&format!("mapping: {}\n", mapping.join(", ")));
        out
    }
}

/// Key with the largest count; ties go to the smallest key
fn majority(counts: &BTreeMap<usize, usize>) -> Option<(usize, usize)> {
    counts
        .iter()
        .fold(None, |best: Option<(usize, usize)>, (&k, &c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((k, c)),
        })
}

/// Score the table by mapping each predicted id in `0..n_classes` to its
/// majority true label
pub fn cluster_accuracy(table: &ContingencyTable, n_classes: usize) -> ClusterAccuracy {
    let per_label = table
        .true_to_pred
        .iter()
        .filter_map(|(&true_label, preds)| {
            let samples: usize = preds.values().sum();
            majority(preds).map(|(best_prediction, count)| LabelMatch {
                true_label,
                samples,
                best_prediction,
                percentage: 100.0 * count as f64 / samples.max(1) as f64,
            })
        })
        .collect();

    let mut label_mapping = BTreeMap::new();
    let mut never_predicted = Vec::new();
    let mut correct = 0;
    let mut wrong = 0;

    for pred in 0..n_classes {
        let Some(truths) = table.pred_to_true.get(&pred) else {
            tracing::debug!(pred, "cluster never predicted");
            never_predicted.push(pred);
            continue;
        };
        let Some((true_label, count)) = majority(truths) else {
            never_predicted.push(pred);
            continue;
        };
        let total: usize = truths.values().sum();
        label_mapping.insert(pred, true_label);
        correct += count;
        wrong += total - count;
    }

    ClusterAccuracy {
        per_label,
        label_mapping,
        never_predicted,
        correct,
        wrong,
    }
}
