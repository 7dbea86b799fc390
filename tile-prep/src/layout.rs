//! Output directory layout of the prepared dataset.

use crate::{common::*, partition::Split};

/// Paths of the prepared dataset below an output root.
///
/// ```text
/// {root}/images/{train,val}/{name}_{index}.{ext}
/// {root}/labels/{train,val}/{name}_{index}.txt
/// {root}/display/{name}_{index}.{ext}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
    image_extension: String,
}

impl OutputLayout {
    pub fn new<P>(root: P, image_extension: &str) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            root: root.as_ref().to_owned(),
            image_extension: image_extension.to_owned(),
        }
    }

    pub fn images_dir(&self, split: Split) -> PathBuf {
        self.root.join("images").join(split.as_str())
    }

    pub fn labels_dir(&self, split: Split) -> PathBuf {
        self.root.join("labels").join(split.as_str())
    }

    pub fn display_dir(&self) -> PathBuf {
        self.root.join("display")
    }

    /// All directories of the layout.
    pub fn dirs(&self) -> Vec<PathBuf> {
        let images = Split::ALL.iter().map(|&split| self.images_dir(split));
        let labels = Split::ALL.iter().map(|&split| self.labels_dir(split));
        images
            .chain(labels)
            .chain([self.display_dir()])
            .collect()
    }

    /// Create the missing directories. Existing directories are kept as is.
    pub fn prepare(&self) -> Result<()> {
        for dir in self.dirs() {
            if dir.is_dir() {
                info!("directory '{}' already exists", dir.display());
            } else {
                fs::create_dir_all(&dir)
                    .with_context(|| format!("failed to create directory '{}'", dir.display()))?;
                info!("created directory '{}'", dir.display());
            }
        }
        Ok(())
    }

    pub fn tile_image_path(&self, split: Split, name: &str, index: usize) -> PathBuf {
        self.images_dir(split)
            .join(format!("{}_{}.{}", name, index, self.image_extension))
    }

    pub fn label_path(&self, split: Split, name: &str, index: usize) -> PathBuf {
        self.labels_dir(split).join(format!("{}_{}.txt", name, index))
    }

    pub fn preview_path(&self, name: &str, index: usize) -> PathBuf {
        self.display_dir()
            .join(format!("{}_{}.{}", name, index, self.image_extension))
    }
}
