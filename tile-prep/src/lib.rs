//! Prepare YOLO training data from large annotated images.
//!
//! Every source image is cut into a grid of tiles (2x2 by default). Boxes that
//! lie entirely inside a tile are moved into the tile frame and written as
//! normalized YOLO records, boxes crossing a tile boundary are dropped. Whole
//! source images are assigned to the training or validation split before
//! tiling.

mod common;

pub mod annotation;
pub mod config;
pub mod dataset;
pub mod encode;
pub mod error;
pub mod layout;
pub mod partition;
pub mod pipeline;
pub mod preview;
pub mod tiling;

pub use error::PrepareError;
pub use pipeline::{run, RunSummary};
