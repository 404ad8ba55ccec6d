//! Dataset types and the VOC dataset.

mod dataset_;
mod sample;
mod voc;

pub use dataset_::*;
pub use sample::*;
pub use voc::*;
