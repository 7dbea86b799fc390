//! YOLO label records.
//!
//! One record per line, `{class} {cx} {cy} {w} {h}`, where the four box fields
//! are normalized by the width and height of the image the box lives in.

use crate::Label;
use anyhow::{ensure, format_err, Context, Error, Result};
use bbox::{CyCxHW, Rect, RectNum, Transform, HW, TLBR};
use std::{
    fmt,
    io::{self, Write},
    str::FromStr,
};

/// The number of fractional digits written per field.
pub const YOLO_PRECISION: usize = 6;

/// A class index paired with a box normalized to the unit square.
pub type YoloRecord<C = usize> = Label<CyCxHW<f64>, C>;

/// A box in integer pixel coordinates.
pub type PixelLabel<C = usize> = Label<TLBR<i64>, C>;

impl<C> Label<TLBR<i64>, C>
where
    C: Copy,
{
    /// Normalize a pixel box against the size of its frame.
    ///
    /// Fails if the frame is empty. The box is not required to lie inside
    /// the frame.
    pub fn try_to_yolo(&self, size: &HW<i64>) -> Result<YoloRecord<C>> {
        ensure!(!size.is_empty(), "frame size must be positive");
        let img_h = size.h() as f64;
        let img_w = size.w() as f64;
        let [t, l, b, r] = self
            .rect
            .try_cast::<f64>()
            .ok_or_else(|| format_err!("box {:?} is not representable as f64", self.rect))?
            .tlbr();

        let cy = (t + b) / 2.0 / img_h;
        let cx = (l + r) / 2.0 / img_w;
        let h = (b - t) / img_h;
        let w = (r - l) / img_w;

        Ok(Label {
            rect: CyCxHW::try_from_cycxhw([cy, cx, h, w])?,
            class: self.class,
        })
    }
}

impl<C> Label<CyCxHW<f64>, C>
where
    C: Copy,
{
    /// Map a normalized record back into the pixel frame of the given size.
    pub fn try_to_pixel(&self, size: &HW<i64>) -> Result<Label<TLBR<f64>, C>> {
        let size: HW<f64> = size
            .try_cast()
            .ok_or_else(|| format_err!("size {:?} is not representable as f64", size))?;
        let transform = Transform::try_normalize(&size)?.inverse();
        let rect: TLBR<f64> = (&transform * &self.rect).into();

        Ok(Label {
            rect,
            class: self.class,
        })
    }

    /// Returns true if every field lies in `[0, 1]` and the box does not
    /// leave the unit square by more than `epsilon`.
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        let unit = 0.0..=1.0;
        let [cy, cx, h, w] = self.rect.cycxhw();
        [cy, cx, h, w].iter().all(|value| unit.contains(value))
            && self.rect.t() >= -epsilon
            && self.rect.l() >= -epsilon
            && self.rect.b() <= 1.0 + epsilon
            && self.rect.r() <= 1.0 + epsilon
    }
}

impl<C> fmt::Display for Label<CyCxHW<f64>, C>
where
    C: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [cy, cx, h, w] = self.rect.cycxhw();
        write!(
            f,
            "{} {:.prec$} {:.prec$} {:.prec$} {:.prec$}",
            self.class,
            cx,
            cy,
            w,
            h,
            prec = YOLO_PRECISION
        )
    }
}

impl FromStr for Label<CyCxHW<f64>, usize> {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<_> = line.split_whitespace().collect();
        ensure!(
            tokens.len() == 5,
            "expect 5 fields in label line, but found {}",
            tokens.len()
        );

        let class = tokens[0]
            .parse::<usize>()
            .with_context(|| format!("invalid class id '{}'", tokens[0]))?;
        let mut values = [0.0f64; 4];
        for (value, token) in values.iter_mut().zip(&tokens[1..]) {
            *value = token
                .parse::<f64>()
                .with_context(|| format!("invalid number '{}'", token))?;
            ensure!(
                (0.0..=1.0).contains(&*value),
                "value {} is out of range 0.0..=1.0",
                value
            );
        }
        let [cx, cy, w, h] = values;

        Ok(Label {
            rect: CyCxHW::try_from_cycxhw([cy, cx, h, w])?,
            class,
        })
    }
}

/// Write records one per line. An empty slice writes nothing.
pub fn write_records<W, C>(mut writer: W, records: &[YoloRecord<C>]) -> io::Result<()>
where
    W: Write,
    C: fmt::Display,
{
    for record in records {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()
}

/// Parse every non-empty line of a label file.
pub fn parse_records(text: &str) -> Result<Vec<YoloRecord>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.parse::<YoloRecord>()
                .with_context(|| format!("invalid label at line {}", index + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn pixel(xyxy: [i64; 4]) -> PixelLabel {
        Label {
            rect: TLBR::try_from_xyxy(xyxy).unwrap(),
            class: 0,
        }
    }

    #[test]
    fn encode_tile_box() {
        let size = HW::try_from_hw([240, 320]).unwrap();
        let record = pixel([10, 10, 300, 200]).try_to_yolo(&size).unwrap();
        assert_eq!(
            record.to_string(),
            "0 0.484375 0.437500 0.906250 0.791667"
        );
    }

    #[test]
    fn encode_rejects_empty_frame() {
        let size = HW::try_from_hw([0, 320]).unwrap();
        assert!(pixel([10, 10, 300, 200]).try_to_yolo(&size).is_err());
    }

    #[test]
    fn decode_restores_pixels() {
        let size = HW::try_from_hw([243, 317]).unwrap();
        let boxes = [[0, 0, 317, 243], [1, 2, 3, 4], [100, 37, 251, 199]];

        for xyxy in boxes {
            let line = pixel(xyxy).try_to_yolo(&size).unwrap().to_string();
            let record: YoloRecord = line.parse().unwrap();
            let restored = record.try_to_pixel(&size).unwrap();
            let [l, t, r, b] = restored.rect.xyxy();
            assert_abs_diff_eq!(l, xyxy[0] as f64, epsilon = 1.0);
            assert_abs_diff_eq!(t, xyxy[1] as f64, epsilon = 1.0);
            assert_abs_diff_eq!(r, xyxy[2] as f64, epsilon = 1.0);
            assert_abs_diff_eq!(b, xyxy[3] as f64, epsilon = 1.0);
        }
    }

    #[test]
    fn normalized_range() {
        let size = HW::try_from_hw([240, 320]).unwrap();
        let inside = pixel([0, 0, 320, 240]).try_to_yolo(&size).unwrap();
        assert!(inside.is_normalized(1e-9));

        let outside = pixel([300, 10, 340, 200]).try_to_yolo(&size).unwrap();
        assert!(!outside.is_normalized(1e-9));
    }

    #[test]
    fn parse_rejects_bad_lines() {
        assert!("0 0.5 0.5 0.1".parse::<YoloRecord>().is_err());
        assert!("0 0.5 0.5 0.1 1.5".parse::<YoloRecord>().is_err());
        assert!("a 0.5 0.5 0.1 0.1".parse::<YoloRecord>().is_err());
        assert!("0 0.5 x 0.1 0.1".parse::<YoloRecord>().is_err());
    }

    #[test]
    fn write_and_parse_file() {
        let size = HW::try_from_hw([240, 320]).unwrap();
        let records: Vec<_> = [[10, 10, 300, 200], [0, 0, 32, 24]]
            .into_iter()
            .map(|xyxy| pixel(xyxy).try_to_yolo(&size).unwrap())
            .collect();

        let mut buf = vec![];
        write_records(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "0 0.484375 0.437500 0.906250 0.791667\n0 0.050000 0.050000 0.100000 0.100000\n"
        );

        let parsed = parse_records(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_abs_diff_eq!(parsed[1].rect.cx(), 0.05);
    }

    #[test]
    fn write_empty_file() {
        let mut buf = vec![];
        write_records::<_, usize>(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
        assert!(parse_records("").unwrap().is_empty());
    }
}
