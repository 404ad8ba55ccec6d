//! Random-access loader for PASCAL VOC style detection datasets.

mod common;
pub mod annotation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod split;
pub mod transform;

pub use annotation::{Annotation, BoxMap, ObjectLabel, PointMap};
pub use config::DatasetConfig;
pub use dataset::{
    load_image, GenericDataset, RandomAccessDataset, Sample, Transform, VocDataset, VOC_CLASSES,
};
pub use error::DatasetError;
pub use layout::VocLayout;
pub use split::{load_split, ClassSelector};
