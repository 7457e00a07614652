//! Loaded models and data for a diagnostics run

use crate::config::VisualizerConfig;
use crate::diagnostics;
use crate::error::{AaeError, Result};
use crate::render::FigureSink;
use aaelens_dataset::{DataLoader, Dataset, IdxDataset, LabelDistribution};
use aaelens_neural::{ClusterAccuracy, PNet, QNet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;

/// Results of [`Session::run_all`] besides the emitted figures
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub label_distribution: LabelDistribution,
    pub accuracy: ClusterAccuracy,
    pub figures: usize,
    pub modes_rendered: bool,
}

/// Encoder, decoders and validation data, checked against each other
pub struct Session {
    config: VisualizerConfig,
    encoder: QNet,
    decoder: PNet,
    mode_decoder: Option<PNet>,
    dataset: IdxDataset,
}

impl Session {
    /// Load checkpoints and the validation split named by `config`
    pub fn load(config: VisualizerConfig) -> Result<Self> {
        config.validate()?;

        let encoder_path = config.encoder_path()?;
        let encoder = QNet::load(&encoder_path, config.z_dim, config.n_classes)?;
        let decoder_path = config.decoder_path()?;
        let decoder = PNet::load(&decoder_path, config.z_dim, config.n_classes)?;

        let mode_decoder = match config.mode_decoder_path() {
            Some(path) => Some(PNet::load(&path, 0, config.n_classes)?),
            None => {
                tracing::warn!(
                    stem = %config.mode_decoder,
                    dir = %config.data_dir.display(),
                    "no mode decoder checkpoint, learned modes will be skipped"
                );
                None
            }
        };

        let dataset = IdxDataset::new(config.dataset_config())?;
        tracing::info!(
            encoder = %encoder_path.display(),
            decoder = %decoder_path.display(),
            parameters = encoder.parameter_count(),
            samples = dataset.len(),
            "session ready"
        );
        Self::new(config, encoder, decoder, mode_decoder, dataset)
    }

    /// Assemble a session from already loaded parts
    pub fn new(
        config: VisualizerConfig,
        encoder: QNet,
        decoder: PNet,
        mode_decoder: Option<PNet>,
        dataset: IdxDataset,
    ) -> Result<Self> {
        config.validate()?;
        if encoder.n_classes() != config.n_classes || encoder.z_dim() != config.z_dim {
            return Err(AaeError::InvalidConfig(format!(
                "encoder has n_classes={} z_dim={}, config declares n_classes={} z_dim={}",
                encoder.n_classes(),
                encoder.z_dim(),
                config.n_classes,
                config.z_dim
            )));
        }
        diagnostics::check_decoder(&decoder, config.n_classes, config.z_dim)?;
        if let Some(ref mode_decoder) = mode_decoder {
            if mode_decoder.n_classes() != config.n_classes {
                return Err(AaeError::InvalidConfig(format!(
                    "mode decoder has {} classes, config declares {}",
                    mode_decoder.n_classes(),
                    config.n_classes
                )));
            }
        }
        if dataset.feature_size() != encoder.input_size() {
            return Err(AaeError::InvalidConfig(format!(
                "images have {} pixels but the encoder takes {} inputs",
                dataset.feature_size(),
                encoder.input_size()
            )));
        }

        Ok(Self {
            config,
            encoder,
            decoder,
            mode_decoder,
            dataset,
        })
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn encoder(&self) -> &QNet {
        &self.encoder
    }

    pub fn decoder(&self) -> &PNet {
        &self.decoder
    }

    pub fn mode_decoder(&self) -> Option<&PNet> {
        self.mode_decoder.as_ref()
    }

    pub fn loader(&self) -> DataLoader<&IdxDataset> {
        DataLoader::new(&self.dataset, self.config.loader_config())
    }

    /// Emits `latent_y_max`, plus `latent_z0` when the encoder has a latent z;
    /// returns the figure count
    pub fn latent_distribution(&self, sink: &mut dyn FigureSink) -> Result<usize> {
        let (y_max, z0) = diagnostics::plot_latent_distribution(&self.encoder, &self.loader())?;
        sink.emit("latent_y_max", &y_max)?;
        match z0 {
            Some(z0) => {
                sink.emit("latent_z0", &z0)?;
                Ok(2)
            }
            None => Ok(1),
        }
    }

    pub fn label_distribution(
        &self,
        sink: &mut dyn FigureSink,
        out: &mut dyn Write,
    ) -> Result<LabelDistribution> {
        let (figure, counts) = diagnostics::plot_predicted_label_distribution(
            &self.encoder,
            &self.loader(),
            self.config.n_classes,
        )?;
        sink.emit("predicted_labels", &figure)?;
        write!(out, "{}", counts.display(40)).map_err(|e| AaeError::io("stdout", e))?;
        Ok(counts)
    }

    pub fn accuracy(&self, out: &mut dyn Write) -> Result<ClusterAccuracy> {
        let score =
            diagnostics::unsupervised_accuracy_score(&self.encoder, &self.loader(), self.config.n_classes)?;
        write!(out, "{}", score.report()).map_err(|e| AaeError::io("stdout", e))?;
        Ok(score)
    }

    pub fn latent_features(&self, sink: &mut dyn FigureSink) -> Result<()> {
        let figure =
            diagnostics::show_learned_latent_features(&self.decoder, self.config.n_classes, self.config.z_dim)?;
        sink.emit("latent_features", &figure)
    }

    pub fn learned_modes(&self, sink: &mut dyn FigureSink) -> Result<()> {
        let mode_decoder = self
            .mode_decoder
            .as_ref()
            .ok_or_else(|| AaeError::MissingModel("mode decoder".to_string()))?;
        let figure = diagnostics::show_all_learned_modes(mode_decoder, self.config.n_classes)?;
        sink.emit("learned_modes", &figure)
    }

    /// Class sample grid then reconstruction for every batch; returns the figure count
    pub fn samples_and_reconstructions(&self, sink: &mut dyn FigureSink) -> Result<usize> {
        let figures = diagnostics::show_samples_of_classes_and_reconstructions(
            &self.encoder,
            &self.decoder,
            &self.loader(),
            self.config.n_classes,
            self.config.z_dim,
        )?;
        for (i, pair) in figures.chunks(2).enumerate() {
            sink.emit(&format!("class_samples_{i:03}"), &pair[0])?;
            if let Some(reconstruction) = pair.get(1) {
                sink.emit(&format!("reconstruction_{i:03}"), reconstruction)?;
            }
        }
        Ok(figures.len())
    }

    pub fn class_samples(&self, sink: &mut dyn FigureSink) -> Result<usize> {
        let loader = self.loader();
        for (i, batch) in loader.iter().enumerate() {
            let figure = diagnostics::show_sample_from_each_class(
                &self.encoder,
                &self.decoder,
                &batch?.images,
                self.config.n_classes,
                self.config.z_dim,
            )?;
            sink.emit(&format!("class_samples_{i:03}"), &figure)?;
        }
        Ok(loader.num_batches())
    }

    pub fn reconstructions(&self, sink: &mut dyn FigureSink) -> Result<usize> {
        let loader = self.loader();
        for (i, batch) in loader.iter().enumerate() {
            let figure = diagnostics::show_reconstruction(&self.encoder, &self.decoder, &batch?.images)?;
            sink.emit(&format!("reconstruction_{i:03}"), &figure)?;
        }
        Ok(loader.num_batches())
    }

    /// `count` digits of class `label`, reproducible through the configured seed
    pub fn generate(&self, sink: &mut dyn FigureSink, label: usize, count: usize) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let figure = diagnostics::generate_digits(
            &self.decoder,
            label,
            self.config.n_classes,
            self.config.z_dim,
            count,
            &mut rng,
        )?;
        sink.emit(&format!("generated_label_{label}"), &figure)
    }

    /// Every diagnostic in turn: latent distribution, predicted labels,
    /// accuracy, latent traversal, learned modes, then the per-batch grids
    pub fn run_all(&self, sink: &mut dyn FigureSink, out: &mut dyn Write) -> Result<RunSummary> {
        let has_style = self.config.z_dim > 0;
        let mut figures = self.latent_distribution(sink)?;
        let label_distribution = self.label_distribution(sink, out)?;
        figures += 1;
        let accuracy = self.accuracy(out)?;

        if has_style {
            self.latent_features(sink)?;
            figures += 1;
        } else {
            tracing::warn!("z_dim is 0, skipping latent z histogram and traversal");
        }

        let modes_rendered = self.mode_decoder.is_some();
        if modes_rendered {
            self.learned_modes(sink)?;
            figures += 1;
        }

        figures += self.samples_and_reconstructions(sink)?;
        Ok(RunSummary {
            label_distribution,
            accuracy,
            figures,
            modes_rendered,
        })
    }
}
