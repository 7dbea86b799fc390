//! Deterministic train/validation split of whole source images.

use crate::common::*;

/// The dataset split a source image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Val,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Val];

    /// The directory name used for this split.
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The size of a fraction of `num_items`, `floor(num_items * fraction)`.
pub fn fraction_count(num_items: usize, fraction: f64) -> Result<usize> {
    ensure!(
        (0.0..=1.0).contains(&fraction),
        "fraction must be in range 0.0..=1.0, but get {}",
        fraction
    );
    Ok((num_items as f64 * fraction).floor() as usize)
}

/// Items partitioned into a training and a validation part.
///
/// The leading items go to training and the trailing `floor(n * val_fraction)`
/// items to validation. Items are never shuffled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSplit<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
}

impl<T> DatasetSplit<T> {
    pub fn new(mut items: Vec<T>, val_fraction: f64) -> Result<Self> {
        let num_val = fraction_count(items.len(), val_fraction)?;
        let num_train = items.len() - num_val;
        let val = items.split_off(num_train);
        Ok(Self { train: items, val })
    }

    pub fn len(&self) -> usize {
        self.train.len() + self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, split: Split) -> &[T] {
        match split {
            Split::Train => &self.train,
            Split::Val => &self.val,
        }
    }

    /// Iterate over all items with their split, training items first.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &T)> {
        let train = self.train.iter().map(|item| (Split::Train, item));
        let val = self.val.iter().map(|item| (Split::Val, item));
        train.chain(val)
    }
}
