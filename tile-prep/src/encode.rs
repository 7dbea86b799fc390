//! Tile label files in YOLO format.

use crate::{common::*, error::PrepareError};
use label::write_records;

/// The class id written for every box. The dataset has a single category.
pub const CLASS_ID: usize = 0;

/// Convert tile-local pixel boxes into normalized records, keeping their order.
pub fn encode_boxes(size: &HW<i64>, boxes: &[TLBR<i64>]) -> Result<Vec<YoloRecord>> {
    boxes
        .iter()
        .map(|&rect| {
            let label: PixelLabel = Label {
                rect,
                class: CLASS_ID,
            };
            label.try_to_yolo(size)
        })
        .collect()
}

/// Write one record per line. An empty record set produces an empty file.
pub fn write_label_file<P>(path: P, records: &[YoloRecord]) -> Result<(), PrepareError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|err| PrepareError::io(path, err))?;
    write_records(BufWriter::new(file), records).map_err(|err| PrepareError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn xyxy(xyxy: [i64; 4]) -> TLBR<i64> {
        TLBR::try_from_xyxy(xyxy).unwrap()
    }

    #[test]
    fn encode_in_order() {
        let size = HW::try_from_hw([240, 320]).unwrap();
        let records =
            encode_boxes(&size, &[xyxy([10, 10, 300, 200]), xyxy([0, 0, 32, 24])]).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.class == CLASS_ID));
        assert_eq!(
            records[0].to_string(),
            "0 0.484375 0.437500 0.906250 0.791667"
        );
        assert_abs_diff_eq!(records[1].rect.cx(), 0.05);
        assert_abs_diff_eq!(records[1].rect.cy(), 0.05);
    }

    #[test]
    fn records_stay_in_unit_square() {
        let size = HW::try_from_hw([24, 32]).unwrap();
        let boxes: Vec<_> = (0..32)
            .step_by(3)
            .flat_map(|l| (l + 1..=32).step_by(5).map(move |r| xyxy([l, 0, r, 24])))
            .collect();

        for record in encode_boxes(&size, &boxes).unwrap() {
            assert!(record.is_normalized(1e-9), "{} is out of range", record);
        }
    }

    #[test]
    fn write_files() {
        let dir = tempfile::tempdir().unwrap();
        let size = HW::try_from_hw([240, 320]).unwrap();

        let path = dir.path().join("a_0.txt");
        let records = encode_boxes(&size, &[xyxy([10, 10, 300, 200])]).unwrap();
        write_label_file(&path, &records).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "0 0.484375 0.437500 0.906250 0.791667\n"
        );

        let path = dir.path().join("a_1.txt");
        write_label_file(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn write_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a_0.txt");
        match write_label_file(&path, &[]) {
            Err(PrepareError::Io { path: err_path, .. }) => assert_eq!(err_path, path),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
