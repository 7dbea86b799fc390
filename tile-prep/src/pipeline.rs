//! The batch driver.

use crate::{
    annotation::load_annotation,
    common::*,
    config::{Config, NegativeConfig},
    dataset::{list_files, load_samples, Sample},
    encode::{encode_boxes, write_label_file},
    error::PrepareError,
    layout::OutputLayout,
    partition::{fraction_count, DatasetSplit, Split},
    preview::save_preview,
    tiling::{split_image, Tile},
};

/// Counters of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub samples_processed: usize,
    pub samples_failed: usize,
    pub tiles_written: usize,
    pub tile_failures: usize,
    pub boxes_kept: usize,
    /// Boxes crossing a tile boundary.
    pub boxes_dropped: usize,
    pub preview_failures: usize,
    pub negatives_copied: usize,
}

impl RunSummary {
    fn add_sample(&mut self, report: &SampleReport) {
        let SampleReport {
            tiles_written,
            tile_failures,
            boxes_kept,
            boxes_dropped,
            preview_failures,
        } = *report;

        self.samples_processed += 1;
        self.tiles_written += tiles_written;
        self.tile_failures += tile_failures;
        self.boxes_kept += boxes_kept;
        self.boxes_dropped += boxes_dropped;
        self.preview_failures += preview_failures;
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples processed, {} failed; {} tiles written, {} failed; \
             {} boxes kept, {} dropped; {} preview failures; {} negatives copied",
            self.samples_processed,
            self.samples_failed,
            self.tiles_written,
            self.tile_failures,
            self.boxes_kept,
            self.boxes_dropped,
            self.preview_failures,
            self.negatives_copied
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SampleReport {
    tiles_written: usize,
    tile_failures: usize,
    boxes_kept: usize,
    boxes_dropped: usize,
    preview_failures: usize,
}

/// Run the whole preparation batch.
///
/// Only an invalid configuration, a failed sample pairing or an uncreatable
/// output directory abort the run. Failures of single samples, tiles,
/// previews and negative images are logged and counted.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let samples = load_samples(
        &config.source_dir,
        &config.image_extension,
        &config.annotation_extension,
    )?;
    let dataset = DatasetSplit::new(samples, config.val_fraction)?;
    info!(
        "{} samples for training, {} samples for validation",
        dataset.train.len(),
        dataset.val.len()
    );

    let layout = OutputLayout::new(&config.output_dir, &config.image_extension);
    layout.prepare()?;

    let mut summary = RunSummary::default();

    for (split, sample) in dataset.iter() {
        info!("processing {}", sample.name);

        match process_sample(config, &layout, split, sample) {
            Ok(report) => {
                info!(
                    "{} done ({} tiles, {} boxes kept, {} dropped)",
                    sample.name, report.tiles_written, report.boxes_kept, report.boxes_dropped
                );
                summary.add_sample(&report);
            }
            Err(err) => {
                error!("failed to process '{}': {:#}", sample.name, err);
                summary.samples_failed += 1;
            }
        }
    }

    if let Some(negatives) = &config.negatives {
        match copy_negatives(config, &layout, negatives) {
            Ok(count) => summary.negatives_copied = count,
            Err(err) => error!("failed to copy negative images: {:#}", err),
        }
    }

    info!("{}", summary);
    Ok(summary)
}

fn process_sample(
    config: &Config,
    layout: &OutputLayout,
    split: Split,
    sample: &Sample,
) -> Result<SampleReport> {
    let Sample {
        name,
        image_file,
        annotation_file,
    } = sample;

    let image = image::open(image_file)
        .with_context(|| format!("failed to load image '{}'", image_file.display()))?;
    let boxes = load_annotation(annotation_file)?;
    let tiles = split_image(&image, &boxes, &config.tile_grid)
        .with_context(|| format!("failed to tile image '{}'", image_file.display()))?;

    let boxes_kept: usize = tiles.iter().map(|tile| tile.boxes.len()).sum();
    let mut report = SampleReport {
        boxes_kept,
        boxes_dropped: boxes.len() - boxes_kept,
        ..Default::default()
    };

    for tile in &tiles {
        match write_tile(config, layout, split, name, tile) {
            Ok(preview_ok) => {
                report.tiles_written += 1;
                if !preview_ok {
                    report.preview_failures += 1;
                }
            }
            Err(err) => {
                error!("failed to write tile {} of '{}': {:#}", tile.index(), name, err);
                report.tile_failures += 1;
            }
        }
    }

    Ok(report)
}

/// Write the tile image, its label file and its preview.
///
/// Returns false if only the preview failed. Files written before a failure
/// are kept.
fn write_tile(
    config: &Config,
    layout: &OutputLayout,
    split: Split,
    name: &str,
    tile: &Tile,
) -> Result<bool> {
    let index = tile.index();

    let image_path = layout.tile_image_path(split, name, index);
    tile.image
        .to_rgb8()
        .save(&image_path)
        .map_err(|err| PrepareError::io(&image_path, err))?;

    let records = encode_boxes(&tile.size(), &tile.boxes)?;
    write_label_file(layout.label_path(split, name, index), &records)?;

    let preview_path = layout.preview_path(name, index);
    match save_preview(&preview_path, &tile.image, &tile.boxes, &config.preview) {
        Ok(()) => Ok(true),
        Err(err) => {
            warn!("{:#}", Error::from(err));
            Ok(false)
        }
    }
}

/// Copy a fraction of the background images into the image directories.
fn copy_negatives(
    config: &Config,
    layout: &OutputLayout,
    negatives: &NegativeConfig,
) -> Result<usize> {
    let NegativeConfig { dir, fraction } = negatives;

    let mut files = list_files(dir, &config.image_extension)?;
    files.truncate(fraction_count(files.len(), *fraction)?);
    let dataset = DatasetSplit::new(files, config.val_fraction)?;

    let mut num_copied = 0;
    for (split, file) in dataset.iter() {
        let file_name = match file.file_name() {
            Some(file_name) => file_name,
            None => continue,
        };
        let target = layout.images_dir(split).join(file_name);

        match fs::copy(file, &target) {
            Ok(_) => num_copied += 1,
            Err(err) => warn!(
                "failed to copy negative image '{}' to '{}': {}",
                file.display(),
                target.display(),
                err
            ),
        }
    }

    info!("copied {} negative images", num_copied);
    Ok(num_copied)
}
