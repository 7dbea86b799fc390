//! Dataset preparation configuration format.

use crate::{common::*, tiling::TileGrid};

pub use negatives::*;
pub use preview::*;

/// The main preparation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The directory containing source images and their XML annotations.
    pub source_dir: PathBuf,
    /// The dataset root where `images/`, `labels/` and `display/` are created.
    pub output_dir: PathBuf,
    /// The fraction of source images assigned to the validation split.
    #[serde(default = "default_val_fraction")]
    pub val_fraction: f64,
    #[serde(default)]
    pub tile_grid: TileGrid,
    /// Source image file extension, also used for the written tiles.
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
    #[serde(default = "default_annotation_extension")]
    pub annotation_extension: String,
    #[serde(default)]
    pub preview: PreviewConfig,
    /// Optional background images copied next to the tiles.
    #[serde(default)]
    pub negatives: Option<NegativeConfig>,
}

impl Config {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let text = fs::read_to_string(path)?;
        let config: Self = json5::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.val_fraction),
            "val_fraction must be in range 0.0..=1.0, but get {}",
            self.val_fraction
        );
        self.tile_grid.validate()?;
        ensure!(
            !self.image_extension.is_empty() && !self.annotation_extension.is_empty(),
            "file extensions must not be empty"
        );
        ensure!(
            self.image_extension != self.annotation_extension,
            "image and annotation extensions must differ"
        );
        ensure!(
            self.preview.stroke_width > 0,
            "preview stroke_width must be positive"
        );
        if let Some(negatives) = &self.negatives {
            ensure!(
                (0.0..=1.0).contains(&negatives.fraction),
                "negatives.fraction must be in range 0.0..=1.0, but get {}",
                negatives.fraction
            );
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("../dataset/sig-train-pos"),
            output_dir: PathBuf::from("../dataset"),
            val_fraction: default_val_fraction(),
            tile_grid: TileGrid::default(),
            image_extension: default_image_extension(),
            annotation_extension: default_annotation_extension(),
            preview: PreviewConfig::default(),
            negatives: None,
        }
    }
}

mod preview {
    use super::*;

    /// Preview rendering options.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct PreviewConfig {
        /// Outline thickness in pixels, growing inwards from the box edge.
        #[serde(default = "default_stroke_width")]
        pub stroke_width: u32,
        /// Outline color as RGB.
        #[serde(default = "default_color")]
        pub color: [u8; 3],
    }

    impl Default for PreviewConfig {
        fn default() -> Self {
            Self {
                stroke_width: default_stroke_width(),
                color: default_color(),
            }
        }
    }

    fn default_stroke_width() -> u32 {
        3
    }

    fn default_color() -> [u8; 3] {
        [255, 0, 0]
    }
}

mod negatives {
    use super::*;

    /// Background images without objects.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NegativeConfig {
        pub dir: PathBuf,
        /// The fraction of listed images to use.
        #[serde(default = "default_negative_fraction")]
        pub fraction: f64,
    }

    fn default_negative_fraction() -> f64 {
        0.2
    }
}

fn default_val_fraction() -> f64 {
    0.2
}

fn default_image_extension() -> String {
    "jpeg".into()
}

fn default_annotation_extension() -> String {
    "xml".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: Config = json5::from_str(
            r#"{
                source_dir: "data/pos",
                output_dir: "data/out",
            }"#,
        )
        .unwrap();

        assert_eq!(config.source_dir, Path::new("data/pos"));
        assert_eq!(config.val_fraction, 0.2);
        assert_eq!(config.tile_grid, TileGrid::default());
        assert_eq!(config.image_extension, "jpeg");
        assert_eq!(config.annotation_extension, "xml");
        assert_eq!(config.preview, PreviewConfig::default());
        assert!(config.negatives.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn full_config() {
        let config: Config = json5::from_str(
            r#"{
                source_dir: "data/pos",
                output_dir: "data/out",
                val_fraction: 0.25,
                tile_grid: { rows: 3, cols: 4 },
                image_extension: "jpg",
                preview: { stroke_width: 1, color: [0, 255, 0] },
                negatives: { dir: "data/neg" },
            }"#,
        )
        .unwrap();

        assert_eq!(config.tile_grid, TileGrid::new(3, 4).unwrap());
        assert_eq!(config.preview.color, [0, 255, 0]);
        let negatives = config.negatives.as_ref().unwrap();
        assert_eq!(negatives.dir, Path::new("data/neg"));
        assert_eq!(negatives.fraction, 0.2);
        config.validate().unwrap();
    }

    #[test]
    fn reject_bad_values() {
        let config = Config {
            val_fraction: 1.5,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            annotation_extension: "jpeg".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config: Config = json5::from_str(
            r#"{ source_dir: "a", output_dir: "b", tile_grid: { rows: 0, cols: 2 } }"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }
}
