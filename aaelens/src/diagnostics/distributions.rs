use crate::error::Result;
use crate::figure::{Figure, HistogramPlot};
use aaelens_core::ops;
use aaelens_dataset::{DataLoader, Dataset, Histogram, LabelDistribution};
use aaelens_neural::QNet;

pub const LATENT_Y_BINS: usize = 15;
pub const LATENT_Z_BINS: usize = 10;

pub const LATENT_Y_TITLE: &str = "distribution of highest \"probability\" given by the latent y vector";
pub const LATENT_Z_TITLE: &str = "distribution of the first element of the latent z vector";
pub const PREDICTED_LABELS_TITLE: &str = "distribution of the predicted labels";

/// Histograms over the first batch: the largest class probability per
/// sample, and the first style component. The second is `None` for an
/// encoder without latent z.
pub fn plot_latent_distribution<D: Dataset<f32>>(
    q: &QNet,
    loader: &DataLoader<D>,
) -> Result<(Figure, Option<Figure>)> {
    let batch = loader.first_batch()?;
    let (latent_y, latent_z) = q.encode(&batch.images)?;

    let y_max = ops::max(&latent_y, 1)?;
    tracing::debug!(samples = y_max.len(), "latent distribution of first batch");
    let y_plot = HistogramPlot::new(LATENT_Y_TITLE, Histogram::compute(&y_max, LATENT_Y_BINS)?)
        .with_x_label("max latent y");

    let z_plot = match q.z_dim() {
        0 => None,
        _ => {
            let z0 = ops::column(&latent_z, 0)?;
            let plot = HistogramPlot::new(LATENT_Z_TITLE, Histogram::compute(&z0, LATENT_Z_BINS)?)
                .with_x_label("latent z[0]");
            Some(Figure::Histogram(plot))
        }
    };
    Ok((Figure::Histogram(y_plot), z_plot))
}

/// Predicted label of every sample in `loader`, counted and binned
pub fn plot_predicted_label_distribution<D: Dataset<f32>>(
    q: &QNet,
    loader: &DataLoader<D>,
    n_classes: usize,
) -> Result<(Figure, LabelDistribution)> {
    let mut distribution = LabelDistribution::new();
    for batch in loader.iter() {
        distribution.extend(&q.predict(&batch?.images)?);
    }
    tracing::info!(samples = distribution.total(), "predicted label distribution");

    let plot = HistogramPlot::new(PREDICTED_LABELS_TITLE, distribution.histogram(n_classes)?)
        .with_x_label("predicted label");
    Ok((Figure::Histogram(plot), distribution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aaelens_core::Tensor;
    use aaelens_dataset::{DataLoaderConfig, TensorDataset};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn loader(n: usize, batch_size: usize) -> Result<DataLoader<TensorDataset<f32>>> {
        let features = Tensor::from_vec((0..n * 4).map(|v| (v % 7) as f32 / 7.0).collect(), &[n, 4])?;
        let labels = Tensor::<f32>::zeros(&[n]);
        Ok(DataLoader::new(TensorDataset::new(features, labels)?, DataLoaderConfig::new(batch_size)))
    }

    #[test]
    fn test_latent_histograms_use_first_batch() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(30);
        let q = QNet::new_random(4, 6, 3, 2, &mut rng)?;
        let (y_fig, z_fig) = plot_latent_distribution(&q, &loader(10, 4)?)?;

        let y = y_fig.as_histogram().expect("histogram");
        assert_eq!(y.title, LATENT_Y_TITLE);
        assert_eq!(y.histogram.bins(), LATENT_Y_BINS);
        assert_eq!(y.histogram.total(), 4);
        // the largest of 3 probabilities is at least 1/3
        assert!(y.histogram.min_value >= 1.0 / 3.0 - 1e-6);

        let z = z_fig.as_ref().and_then(Figure::as_histogram).expect("histogram");
        assert_eq!(z.title, LATENT_Z_TITLE);
        assert_eq!(z.histogram.bins(), LATENT_Z_BINS);
        assert_eq!(z.histogram.total(), 4);
        Ok(())
    }

    #[test]
    fn test_latent_y_histogram_without_z() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(31);
        let q = QNet::new_random(4, 6, 3, 0, &mut rng)?;
        let (y_fig, z_fig) = plot_latent_distribution(&q, &loader(4, 2)?)?;
        assert_eq!(y_fig.title(), Some(LATENT_Y_TITLE));
        assert_eq!(y_fig.as_histogram().map(|p| p.histogram.total()), Some(2));
        assert!(z_fig.is_none());
        Ok(())
    }

    #[test]
    fn test_predicted_labels_cover_every_batch() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(32);
        let q = QNet::new_random(4, 6, 5, 2, &mut rng)?;
        let (figure, counts) = plot_predicted_label_distribution(&q, &loader(11, 3)?, 5)?;

        assert_eq!(counts.total(), 11);
        assert!(counts.labels().iter().all(|&l| l < 5));
        let plot = figure.as_histogram().expect("histogram");
        assert_eq!(plot.title, PREDICTED_LABELS_TITLE);
        assert_eq!(plot.histogram.bins(), 5);
        assert_eq!(plot.histogram.total(), 11);
        Ok(())
    }
}
