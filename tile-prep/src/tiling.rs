//! Grid tiling of source images and their boxes.

use crate::common::*;

/// Rows and columns of the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    pub rows: u32,
    pub cols: u32,
}

impl TileGrid {
    pub fn new(rows: u32, cols: u32) -> Result<Self> {
        let grid = Self { rows, cols };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.rows > 0 && self.cols > 0,
            "tile grid must have at least one row and one column, but get {}x{}",
            self.rows,
            self.cols
        );
        Ok(())
    }

    pub fn num_tiles(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Compute the tile rectangles of a `width` x `height` image in row-major
    /// order.
    ///
    /// Every tile measures `width / cols` by `height / rows` pixels. When the
    /// image size is not divisible by the grid, the remainder columns on the
    /// right and rows at the bottom belong to no tile.
    pub fn layout(&self, width: u32, height: u32) -> Result<Vec<TileRect>> {
        self.validate()?;
        let sub_w = width / self.cols;
        let sub_h = height / self.rows;
        ensure!(
            sub_w > 0 && sub_h > 0,
            "image size {}x{} is too small for a {}x{} grid",
            width,
            height,
            self.rows,
            self.cols
        );

        let size = HW::try_from_hw([sub_h as i64, sub_w as i64])?;
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .enumerate()
            .map(|(index, (row, col))| -> Result<_> {
                let upper = (row * sub_h) as i64;
                let left = (col * sub_w) as i64;
                let rect = TLBR::try_from_tlhw([upper, left, size.h(), size.w()])?;
                Ok(TileRect {
                    index,
                    row,
                    col,
                    rect,
                    size,
                })
            })
            .collect()
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self { rows: 2, cols: 2 }
    }
}

/// The pixel rectangle of one tile inside its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    /// Row-major position, `row * cols + col`.
    pub index: usize,
    pub row: u32,
    pub col: u32,
    pub rect: TLBR<i64>,
    pub size: HW<i64>,
}

impl TileRect {
    /// Keep the boxes fully inside this tile and move them into the tile frame.
    ///
    /// The input order is preserved.
    pub fn reproject(&self, boxes: &[TLBR<i64>]) -> Vec<TLBR<i64>> {
        let shift = Transform::translation(-self.rect.t(), -self.rect.l());
        boxes
            .iter()
            .filter(|bbox| self.rect.contains(*bbox))
            .map(|bbox| &shift * bbox)
            .collect()
    }
}

/// A cropped tile with the boxes it fully contains, in tile coordinates.
#[derive(Debug, Clone)]
pub struct Tile {
    pub rect: TileRect,
    pub image: DynamicImage,
    pub boxes: Vec<TLBR<i64>>,
}

impl Tile {
    pub fn index(&self) -> usize {
        self.rect.index
    }

    pub fn size(&self) -> HW<i64> {
        self.rect.size
    }
}

/// Cut an image into grid tiles and distribute its boxes.
///
/// Boxes crossing a tile boundary are dropped from every tile.
pub fn split_image(image: &DynamicImage, boxes: &[TLBR<i64>], grid: &TileGrid) -> Result<Vec<Tile>> {
    let (width, height) = image.dimensions();
    let tiles = grid
        .layout(width, height)?
        .into_iter()
        .map(|rect| {
            let [t, l, h, w] = rect.rect.tlhw();
            let image = image.crop_imm(l as u32, t as u32, w as u32, h as u32);
            let boxes = rect.reproject(boxes);
            Tile { rect, image, boxes }
        })
        .collect();
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xyxy(xyxy: [i64; 4]) -> TLBR<i64> {
        TLBR::try_from_xyxy(xyxy).unwrap()
    }

    #[test]
    fn quadrant_layout() {
        let rects = TileGrid::default().layout(640, 480).unwrap();
        let corners: Vec<_> = rects.iter().map(|rect| rect.rect.xyxy()).collect();
        assert_eq!(
            corners,
            vec![
                [0, 0, 320, 240],
                [320, 0, 640, 240],
                [0, 240, 320, 480],
                [320, 240, 640, 480],
            ]
        );
        let positions: Vec<_> = rects
            .iter()
            .map(|rect| (rect.index, rect.row, rect.col))
            .collect();
        assert_eq!(positions, vec![(0, 0, 0), (1, 0, 1), (2, 1, 0), (3, 1, 1)]);
    }

    #[test]
    fn layout_partitions_image() {
        for (width, height, grid) in [
            (640, 480, TileGrid::default()),
            (641, 481, TileGrid::default()),
            (100, 77, TileGrid::new(3, 5).unwrap()),
        ] {
            let rects = grid.layout(width, height).unwrap();
            assert_eq!(rects.len(), grid.num_tiles());

            // count how many tiles cover each pixel
            let mut coverage = vec![0u32; (width * height) as usize];
            for tile in &rects {
                let [t, l, b, r] = tile.rect.tlbr();
                for y in t..b {
                    for x in l..r {
                        coverage[(y as u32 * width + x as u32) as usize] += 1;
                    }
                }
            }
            assert!(coverage.iter().all(|&count| count <= 1));

            let uncovered = coverage.iter().filter(|&&count| count == 0).count() as u32;
            let rem_w = width % grid.cols;
            let rem_h = height % grid.rows;
            assert_eq!(uncovered, rem_w * height + rem_h * width - rem_w * rem_h);
        }
    }

    #[test]
    fn layout_rejects_tiny_image() {
        assert!(TileGrid::default().layout(1, 480).is_err());
        assert!(TileGrid::default().layout(640, 1).is_err());
        assert!(TileGrid::new(0, 2).is_err());
    }

    #[test]
    fn reproject_contained_box() {
        let rects = TileGrid::default().layout(640, 480).unwrap();
        let boxes = [xyxy([330, 250, 400, 300])];

        let kept: Vec<_> = rects.iter().map(|rect| rect.reproject(&boxes)).collect();
        assert!(kept[0].is_empty());
        assert!(kept[1].is_empty());
        assert!(kept[2].is_empty());
        assert_eq!(kept[3], vec![xyxy([10, 10, 80, 60])]);
    }

    #[test]
    fn drop_straddling_box() {
        let rects = TileGrid::default().layout(640, 480).unwrap();
        let boxes = [xyxy([300, 10, 340, 200]), xyxy([10, 230, 50, 250])];
        assert!(rects.iter().all(|rect| rect.reproject(&boxes).is_empty()));
    }

    #[test]
    fn box_on_tile_edge_is_kept() {
        let rects = TileGrid::default().layout(640, 480).unwrap();
        let boxes = [xyxy([0, 0, 320, 240]), xyxy([320, 240, 640, 480])];
        assert_eq!(rects[0].reproject(&boxes), vec![xyxy([0, 0, 320, 240])]);
        assert_eq!(rects[3].reproject(&boxes), vec![xyxy([0, 0, 320, 240])]);
        assert!(rects[1].reproject(&boxes).is_empty());
        assert!(rects[2].reproject(&boxes).is_empty());
    }

    #[test]
    fn reproject_keeps_order() {
        let rects = TileGrid::default().layout(640, 480).unwrap();
        let boxes = [
            xyxy([100, 100, 120, 120]),
            xyxy([400, 10, 420, 20]),
            xyxy([10, 10, 20, 20]),
            xyxy([50, 60, 70, 80]),
        ];
        assert_eq!(
            rects[0].reproject(&boxes),
            vec![
                xyxy([100, 100, 120, 120]),
                xyxy([10, 10, 20, 20]),
                xyxy([50, 60, 70, 80]),
            ]
        );
        assert_eq!(rects[1].reproject(&boxes), vec![xyxy([80, 10, 100, 20])]);
    }

    #[test]
    fn split_crops_exact_pixels() {
        let mut raster = RgbImage::new(65, 49);
        for (x, y, pixel) in raster.enumerate_pixels_mut() {
            *pixel = Rgb([x as u8, y as u8, 0]);
        }
        let image = DynamicImage::ImageRgb8(raster);

        let tiles = split_image(&image, &[xyxy([33, 25, 40, 30])], &TileGrid::default()).unwrap();
        assert_eq!(tiles.len(), 4);

        for tile in &tiles {
            assert_eq!(tile.image.dimensions(), (32, 24));
        }

        let bottom_right = tiles[3].image.to_rgb8();
        assert_eq!(*bottom_right.get_pixel(0, 0), Rgb([32, 24, 0]));
        assert_eq!(*bottom_right.get_pixel(31, 23), Rgb([63, 47, 0]));
        assert_eq!(tiles[3].boxes, vec![xyxy([1, 1, 8, 6])]);
        assert_eq!(tiles[3].index(), 3);
        assert_eq!((tiles[3].size().h(), tiles[3].size().w()), (24, 32));
        assert!(tiles[..3].iter().all(|tile| tile.boxes.is_empty()));
    }
}
