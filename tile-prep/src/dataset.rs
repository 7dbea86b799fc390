//! Source image and annotation discovery.

use crate::{common::*, error::PrepareError};

/// A source image paired with its annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sample {
    /// The shared file stem, used to name the output tiles.
    pub name: String,
    pub image_file: PathBuf,
    pub annotation_file: PathBuf,
}

/// List the files in `dir` with the given extension, sorted by path.
pub fn list_files<P>(dir: P, extension: &str) -> Result<Vec<PathBuf>>
where
    P: AsRef<Path>,
{
    let dir = dir.as_ref();
    ensure!(dir.is_dir(), "'{}' is not a directory", dir.display());

    let pattern = format!(
        "{}/*.{}",
        glob::Pattern::escape(&dir.display().to_string()),
        extension
    );
    let mut files: Vec<_> = glob::glob(&pattern)?
        .map(|result| -> Result<_> {
            let path = result?;
            Ok(path.is_file().then(|| path))
        })
        .filter_map(|result| result.transpose())
        .try_collect()?;
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| format_err!("invalid file name '{}'", path.display()))?;
    Ok(stem.to_owned())
}

/// Pair images with annotations sharing the same file stem.
///
/// The result follows the order of `image_files`. Fails if the counts differ
/// or if any stem has no counterpart.
pub fn pair_samples(image_files: Vec<PathBuf>, annotation_files: Vec<PathBuf>) -> Result<Vec<Sample>> {
    if image_files.len() != annotation_files.len() {
        return Err(PrepareError::CountMismatch {
            images: image_files.len(),
            annotations: annotation_files.len(),
        }
        .into());
    }

    let mut annotations: HashMap<String, PathBuf> = annotation_files
        .into_iter()
        .map(|path| -> Result<_> { Ok((file_stem(&path)?, path)) })
        .collect::<Result<_>>()?;

    let mut unmatched = vec![];
    let mut samples = vec![];

    for image_file in image_files {
        let name = file_stem(&image_file)?;
        match annotations.remove(&name) {
            Some(annotation_file) => samples.push(Sample {
                name,
                image_file,
                annotation_file,
            }),
            None => unmatched.push(name),
        }
    }

    unmatched.extend(annotations.into_keys());
    if !unmatched.is_empty() {
        unmatched.sort();
        unmatched.dedup();
        return Err(PrepareError::UnmatchedStem { stems: unmatched }.into());
    }

    Ok(samples)
}

/// Discover and pair all samples in a source directory.
pub fn load_samples<P>(source_dir: P, image_extension: &str, annotation_extension: &str) -> Result<Vec<Sample>>
where
    P: AsRef<Path>,
{
    let source_dir = source_dir.as_ref();
    let image_files = list_files(source_dir, image_extension)?;
    let annotation_files = list_files(source_dir, annotation_extension)?;
    info!(
        "found {} images and {} annotations in '{}'",
        image_files.len(),
        annotation_files.len(),
        source_dir.display()
    );
    pair_samples(image_files, annotation_files)
}
