//! Stock image transforms.
//!
//! Any closure from an `H×W×3` image to a result can serve as a transform.
//! These cover the common cases.

use crate::common::*;

/// Return the image unchanged.
pub fn identity(image: &Array3<u8>) -> Result<Array3<u8>> {
    Ok(image.clone())
}

/// Convert an `H×W×C` byte image into a `C×H×W` float image in `[0, 1]`.
pub fn to_tensor(image: &Array3<u8>) -> Result<Array3<f32>> {
    let chw = image
        .view()
        .permuted_axes([2, 0, 1])
        .mapv(|value| value as f32 / 255.0);
    Ok(chw)
}
