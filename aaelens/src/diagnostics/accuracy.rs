use crate::error::Result;
use aaelens_dataset::{DataLoader, Dataset};
use aaelens_neural::metrics::{cluster_accuracy, predict_labels, ClusterAccuracy, ContingencyTable};
use aaelens_neural::QNet;

/// Score the encoder's clustering of `loader` against the true labels,
/// mapping each cluster to its majority label
pub fn unsupervised_accuracy_score<D: Dataset<f32>>(
    q: &QNet,
    loader: &DataLoader<D>,
    n_classes: usize,
) -> Result<ClusterAccuracy> {
    let mut table = ContingencyTable::new();
    for batch in loader.iter() {
        let batch = batch?;
        let predicted = predict_labels(q, &batch.images)?;
        table.record_batch(&batch.labels, &predicted)?;
    }

    let score = cluster_accuracy(&table, n_classes);
    for m in &score.per_label {
        tracing::info!(
            true_label = m.true_label,
            samples = m.samples,
            best_prediction = m.best_prediction,
            "{:.2}% of samples share the best matching cluster",
            m.percentage
        );
    }
    if !score.never_predicted.is_empty() {
        tracing::info!(clusters = ?score.never_predicted, "clusters never predicted");
    }
    tracing::info!(
        correct = score.correct,
        wrong = score.wrong,
        "unsupervised accuracy {:.2}%",
        score.percentage()
    );
    tracing::debug!(mapping = ?score.label_mapping, "cluster to label mapping");
    tracing::debug!("contingency table:\n{table}");
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aaelens_core::Tensor;
    use aaelens_dataset::{DataLoaderConfig, TensorDataset};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_score_counts_every_sample() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(70);
        let q = QNet::new_random(4, 6, 3, 2, &mut rng)?;
        let features = Tensor::from_vec((0..28).map(|v| (v % 5) as f32 / 5.0).collect(), &[7, 4])?;
        let labels = Tensor::from_vec(vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0], &[7])?;
        let loader = DataLoader::new(TensorDataset::new(features, labels)?, DataLoaderConfig::new(3));

        let score = unsupervised_accuracy_score(&q, &loader, 3)?;
        assert_eq!(score.correct + score.wrong, 7);
        assert!(score.accuracy() > 0.0 && score.accuracy() <= 1.0);
        // a majority vote never scores below the largest true class share
        assert!(score.correct >= 3);
        Ok(())
    }
}
