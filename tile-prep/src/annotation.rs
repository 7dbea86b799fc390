//! Pascal VOC style XML annotation sidecars.
//!
//! Only the box corners are read, everything else in the document is ignored.
//! Repeated elements may be interleaved with other siblings.
//!
//! ```xml
//! <annotation>
//!   <filename>0001.jpeg</filename>
//!   <object>
//!     <name>sig</name>
//!     <bndbox><xmin>10</xmin><ymin>10</ymin><xmax>300</xmax><ymax>200</ymax></bndbox>
//!   </object>
//! </annotation>
//! ```

use crate::{common::*, error::PrepareError};

#[derive(Debug, Clone, Deserialize)]
struct AnnotationDoc {
    #[serde(rename = "object", default)]
    objects: Vec<ObjectDoc>,
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectDoc {
    #[serde(rename = "bndbox", default)]
    bndboxes: Vec<BndBoxDoc>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct BndBoxDoc {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

/// Parse the boxes of an annotation document in document order.
///
/// Every `bndbox` of every object is read. Objects without a `bndbox`
/// element are skipped. A box with `xmin >= xmax` or `ymin >= ymax` fails
/// the whole document.
pub fn parse_annotation(text: &str) -> Result<Vec<TLBR<i64>>, PrepareError> {
    let mut de = serde_xml_rs::Deserializer::new_from_reader(text.as_bytes())
        .non_contiguous_seq_elements(true);
    let doc = AnnotationDoc::deserialize(&mut de)?;

    doc.objects
        .iter()
        .flat_map(|obj| obj.bndboxes.iter().copied())
        .enumerate()
        .map(|(index, bndbox)| {
            let BndBoxDoc {
                xmin,
                ymin,
                xmax,
                ymax,
            } = bndbox;
            let xyxy = [xmin, ymin, xmax, ymax];

            match TLBR::try_from_xyxy(xyxy) {
                Ok(tlbr) if tlbr.is_proper() => Ok(tlbr),
                _ => Err(PrepareError::InvalidBox { index, xyxy }),
            }
        })
        .collect()
}

/// Read and parse an annotation file.
pub fn load_annotation<P>(path: P) -> Result<Vec<TLBR<i64>>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read annotation file '{}'", path.display()))?;
    let boxes = parse_annotation(&text)
        .with_context(|| format!("failed to parse annotation file '{}'", path.display()))?;
    debug!("loaded {} boxes from '{}'", boxes.len(), path.display());
    Ok(boxes)
}
