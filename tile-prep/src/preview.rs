//! Annotated tile previews for visual inspection.

use crate::{common::*, config::PreviewConfig, error::PrepareError};
use imageproc::{drawing::draw_hollow_rect_mut, rect::Rect as DrawRect};

/// Draw box outlines onto an RGB copy of `image`.
///
/// The outline covers the box edge including the `xmax` column and `ymax`
/// row, and grows inwards with the stroke width. Parts outside the image are
/// clipped.
pub fn draw_boxes(image: &DynamicImage, boxes: &[TLBR<i64>], style: &PreviewConfig) -> RgbImage {
    let mut canvas = image.to_rgb8();
    let color = Rgb(style.color);

    for bbox in boxes {
        let [l, t, r, b] = bbox.xyxy();

        for offset in 0..style.stroke_width as i64 {
            let width = r - l + 1 - 2 * offset;
            let height = b - t + 1 - 2 * offset;
            if width <= 0 || height <= 0 {
                break;
            }

            let rect = DrawRect::at((l + offset) as i32, (t + offset) as i32)
                .of_size(width as u32, height as u32);
            draw_hollow_rect_mut(&mut canvas, rect, color);
        }
    }

    canvas
}

/// Render the boxes onto a copy of the tile and save it.
pub fn save_preview<P>(
    path: P,
    image: &DynamicImage,
    boxes: &[TLBR<i64>],
    style: &PreviewConfig,
) -> Result<(), PrepareError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    draw_boxes(image, boxes, style)
        .save(path)
        .map_err(|err| PrepareError::io(path, err))
}
