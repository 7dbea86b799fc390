//! Common imports from external crates.

pub use anyhow::{ensure, format_err, Context, Error, Result};
pub use bbox::{prelude::*, Transform, HW, TLBR};
pub use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
pub use itertools::Itertools;
pub use label::{Label, PixelLabel, YoloRecord};
pub use log::{debug, error, info, warn};
pub use serde::{Deserialize, Serialize};
pub use std::{
    collections::HashMap,
    fmt, fs,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};
