use crate::{
    annotation::{BoxMap, PointMap},
    common::*,
};

/// The record produced for one index.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    /// The decoded `H×W×3` image.
    pub image: Array3<u8>,
    /// The output of the dataset transform.
    pub trans_img: T,
    pub gt_box: BoxMap,
    pub gt_point: PointMap,
}

impl<T> Sample<T> {
    /// The number of objects over all classes.
    pub fn num_objects(&self) -> usize {
        self.gt_box.values().map(Vec::len).sum()
    }

    /// The image size in `(height, width)`.
    pub fn image_hw(&self) -> (usize, usize) {
        let (h, w, _) = self.image.dim();
        (h, w)
    }
}
