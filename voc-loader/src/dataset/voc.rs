use super::*;
use crate::{
    annotation::Annotation,
    common::*,
    config::DatasetConfig,
    error::DatasetError,
    layout::VocLayout,
    split::{load_split, ClassSelector},
};

const VOC_DEPTH: usize = 3;

/// The 20 object classes of PASCAL VOC.
pub const VOC_CLASSES: [&str; 20] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// A function from a decoded image to the model input.
pub type Transform<T> = Box<dyn Fn(&Array3<u8>) -> Result<T> + Send + Sync>;

/// The Pascal VOC dataset.
///
/// The list of image ids is fixed when the dataset is opened. Every access
/// reads the image and annotation from disk again.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct VocDataset<T> {
    layout: VocLayout,
    selector: ClassSelector,
    split: String,
    classes: IndexSet<String>,
    image_ids: Vec<String>,
    #[derivative(Debug = "ignore")]
    transform: Option<Transform<T>>,
}

impl<T> VocDataset<T> {
    /// Open the split `split` of the VOC release `year` under `dataset_dir`.
    pub fn open(
        dataset_dir: impl AsRef<Path>,
        year: impl Display,
        selector: ClassSelector,
        split: impl Into<String>,
        transform: Option<Transform<T>>,
    ) -> Result<Self> {
        let layout = VocLayout::new(dataset_dir, year);
        let split = split.into();
        let image_ids = load_split(&layout, &selector, &split)?;
        let classes = VOC_CLASSES.iter().map(|&name| name.to_owned()).collect();

        Ok(Self {
            layout,
            selector,
            split,
            classes,
            image_ids,
            transform,
        })
    }

    pub fn from_config(config: &DatasetConfig, transform: Option<Transform<T>>) -> Result<Self> {
        let DatasetConfig {
            dataset_dir,
            year,
            class,
            split,
        } = config;
        Self::open(dataset_dir, year, class.clone(), split.clone(), transform)
    }

    pub fn len(&self) -> usize {
        self.image_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_ids.is_empty()
    }

    pub fn layout(&self) -> &VocLayout {
        &self.layout
    }

    pub fn selector(&self) -> &ClassSelector {
        &self.selector
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    pub fn image_ids(&self) -> &[String] {
        &self.image_ids
    }

    pub fn image_id(&self, index: usize) -> Result<&str> {
        let image_id = self
            .image_ids
            .get(index)
            .ok_or(DatasetError::IndexOutOfRange {
                index,
                len: self.len(),
            })?;
        Ok(image_id.as_str())
    }

    /// Decode the image at `index` into an `H×W×3` array.
    pub fn image(&self, index: usize) -> Result<Array3<u8>> {
        let image_id = self.image_id(index)?;
        load_image(self.layout.image_file(image_id))
    }

    /// Parse the annotation at `index` without touching the image.
    pub fn annotation(&self, index: usize) -> Result<Annotation> {
        let image_id = self.image_id(index)?;
        Annotation::open(self.layout.annotation_file(image_id))
    }

    /// Load the sample at `index`.
    ///
    /// The image is decoded and the annotation parsed before the transform
    /// runs. A dataset opened without a transform fails here.
    pub fn get(&self, index: usize) -> Result<Sample<T>> {
        let image_id = self.image_id(index)?;
        trace!("load sample {} ({})", index, image_id);

        let image = load_image(self.layout.image_file(image_id))?;
        let annotation = Annotation::open(self.layout.annotation_file(image_id))?;

        let transform = self
            .transform
            .as_ref()
            .ok_or(DatasetError::MissingTransform)?;
        let trans_img = transform(&image)?;
        let (gt_box, gt_point) = annotation.boxes_and_points();

        Ok(Sample {
            image,
            trans_img,
            gt_box,
            gt_point,
        })
    }
}

impl<T> GenericDataset for VocDataset<T> {
    fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }
}

impl<T> RandomAccessDataset for VocDataset<T> {
    type Record = Sample<T>;

    fn num_records(&self) -> usize {
        self.len()
    }

    fn nth(&self, index: usize) -> Result<Sample<T>> {
        self.get(index)
    }
}

/// Decode an image file into an `H×W×3` array, converting to RGB.
pub fn load_image(path: impl AsRef<Path>) -> Result<Array3<u8>> {
    let path = path.as_ref();
    let image: RgbImage = image::io::Reader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| {
            format!(
                "failed to determine the image file format: {}",
                path.display()
            )
        })?
        .decode()
        .with_context(|| format!("failed to decode image file: {}", path.display()))?
        .to_rgb8();

    let (width, height) = image.dimensions();
    let array = Array3::from_shape_vec(
        (height as usize, width as usize, VOC_DEPTH),
        image.into_raw(),
    )?;
    Ok(array)
}
