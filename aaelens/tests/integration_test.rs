use aaelens::prelude::*;
use aaelens_dataset::real_datasets::encode_idx;
use aaelens_neural::WeightLoader;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tempfile::TempDir;

const SIDE: usize = 4;
const N_CLASSES: usize = 3;
const Z_DIM: usize = 2;
const SAMPLES: usize = 10;

fn io(path: &Path) -> impl Fn(std::io::Error) -> AaeError + '_ {
    move |e| AaeError::io(path, e)
}

/// Checkpoints named after the `unsupervised` mode plus a validation split
fn write_fixture(dir: &Path, z_dim: usize, with_mode_decoder: bool) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(2024);
    let pixels = SIDE * SIDE;
    let loader = WeightLoader::new();

    let q = QNet::new_random(pixels, 12, N_CLASSES, z_dim, &mut rng)?;
    loader.save_to_file(&q.state_dict()?, dir.join("encoder_unsupervised.safetensors"))?;
    let p = PNet::new_random(N_CLASSES, z_dim, 12, pixels, &mut rng)?;
    loader.save_to_file(&p.state_dict()?, dir.join("decoder_unsupervised.json"))?;
    if with_mode_decoder {
        let mode = PNet::new_random(N_CLASSES, 0, 12, pixels, &mut rng)?;
        loader.save_to_file(&mode.state_dict()?, dir.join("mode_decoder_unsupervised.safetensors"))?;
    }

    let images: Vec<Vec<u8>> = (0..SAMPLES)
        .map(|i| (0..pixels).map(|j| ((i * 31 + j * 17) % 256) as u8).collect())
        .collect();
    let labels: Vec<u8> = (0..SAMPLES).map(|i| (i % 10) as u8).collect();
    let (image_bytes, label_bytes) = encode_idx(&images, SIDE, SIDE, &labels);

    let images_path = dir.join("t10k-images-idx3-ubyte");
    std::fs::write(&images_path, image_bytes).map_err(io(&images_path))?;
    let labels_path = dir.join("t10k-labels-idx1-ubyte");
    std::fs::write(&labels_path, label_bytes).map_err(io(&labels_path))?;
    Ok(())
}

fn config(dir: &Path) -> VisualizerConfig {
    VisualizerConfig {
        data_dir: dir.to_path_buf(),
        n_classes: N_CLASSES,
        z_dim: Z_DIM,
        batch_size: 4,
        output_dir: dir.join("plots"),
        ..VisualizerConfig::default()
    }
}

#[test]
fn test_run_all_in_order() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), Z_DIM, true)?;

    let session = Session::load(config(dir.path()))?;
    assert!(session.mode_decoder().is_some());

    let mut sink = MemorySink::default();
    let mut out = Vec::new();
    let summary = session.run_all(&mut sink, &mut out)?;

    assert_eq!(
        sink.names(),
        vec![
            "latent_y_max",
            "latent_z0",
            "predicted_labels",
            "latent_features",
            "learned_modes",
            "class_samples_000",
            "reconstruction_000",
            "class_samples_001",
            "reconstruction_001",
            "class_samples_002",
            "reconstruction_002",
        ]
    );
    assert_eq!(summary.figures, sink.figures.len());
    assert!(summary.modes_rendered);
    assert_eq!(summary.label_distribution.total(), SAMPLES);
    assert_eq!(summary.accuracy.correct + summary.accuracy.wrong, SAMPLES);

    let text = String::from_utf8(out).map_err(|e| AaeError::invalid_argument("stdout", e.to_string()))?;
    assert!(text.contains("Label distribution (10 samples)"));
    assert!(text.contains("accuracy: "));
    Ok(())
}

#[test]
fn test_grid_shapes_match_model_sizes() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), Z_DIM, true)?;
    let session = Session::load(config(dir.path()))?;

    let mut sink = MemorySink::default();
    session.latent_features(&mut sink)?;
    session.learned_modes(&mut sink)?;
    session.class_samples(&mut sink)?;

    let traversal = sink.get("latent_features").and_then(Figure::as_grid).map(|g| (g.rows(), g.cols()));
    assert_eq!(traversal, Some((N_CLASSES, 10)));
    let modes = sink.get("learned_modes").and_then(Figure::as_grid).map(|g| (g.rows(), g.cols()));
    assert_eq!(modes, Some((1, N_CLASSES)));
    let samples = sink.get("class_samples_000").and_then(Figure::as_grid);
    assert_eq!(samples.map(|g| (g.rows(), g.cols())), Some((N_CLASSES, 9)));
    assert_eq!(samples.map(ImageGrid::image_side), Some(SIDE));
    Ok(())
}

#[test]
fn test_missing_mode_decoder_is_skipped() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), Z_DIM, false)?;
    let session = Session::load(VisualizerConfig {
        max_batches: Some(1),
        ..config(dir.path())
    })?;

    let mut sink = MemorySink::default();
    let summary = session.run_all(&mut sink, &mut std::io::sink())?;
    assert!(!summary.modes_rendered);
    assert!(!sink.names().contains(&"learned_modes"));
    assert!(matches!(session.learned_modes(&mut sink), Err(AaeError::MissingModel(_))));
    assert_eq!(summary.label_distribution.total(), 4);
    Ok(())
}

#[test]
fn test_run_all_without_latent_z() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), 0, false)?;
    let session = Session::load(VisualizerConfig {
        z_dim: 0,
        max_batches: Some(1),
        ..config(dir.path())
    })?;

    let mut sink = MemorySink::default();
    let summary = session.run_all(&mut sink, &mut std::io::sink())?;
    assert_eq!(
        sink.names(),
        vec!["latent_y_max", "predicted_labels", "class_samples_000", "reconstruction_000"]
    );
    assert_eq!(summary.figures, 4);
    let y_max = sink.get("latent_y_max").and_then(Figure::as_histogram);
    assert_eq!(y_max.map(|p| p.histogram.total()), Some(4));
    Ok(())
}

#[test]
fn test_declared_sizes_must_match_checkpoints() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), Z_DIM, false)?;
    let err = Session::load(VisualizerConfig {
        n_classes: 16,
        ..config(dir.path())
    });
    assert!(matches!(err, Err(AaeError::Tensor(_))));
    Ok(())
}

#[test]
fn test_generate_is_seeded() -> Result<()> {
    let dir = TempDir::new().map_err(io(Path::new("tempdir")))?;
    write_fixture(dir.path(), Z_DIM, false)?;
    let session = Session::load(config(dir.path()))?;

    let mut first = MemorySink::default();
    let mut second = MemorySink::default();
    session.generate(&mut first, 2, 5)?;
    session.generate(&mut second, 2, 5)?;
    assert_eq!(first.get("generated_label_2"), second.get("generated_label_2"));
    assert!(session.generate(&mut first, N_CLASSES, 5).is_err());
    Ok(())
}
