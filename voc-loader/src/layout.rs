use crate::common::*;

const DEVKIT_DIR: &str = "VOCdevkit";
const ARCHIVE_PREFIX: &str = "VOC";

/// Directory layout of one VOC release, `<root>/VOCdevkit/VOC<year>`.
///
/// Paths are composed only. Missing directories show up when a file is
/// first read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VocLayout {
    year: String,
    dir: PathBuf,
}

impl VocLayout {
    pub fn new(root: impl AsRef<Path>, year: impl Display) -> Self {
        let year = year.to_string();
        let dir = root
            .as_ref()
            .join(DEVKIT_DIR)
            .join(format!("{}{}", ARCHIVE_PREFIX, year));
        Self { year, dir }
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    /// The `VOC<year>` directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn split_dir(&self) -> PathBuf {
        self.dir.join("ImageSets").join("Main")
    }

    /// `ImageSets/Main/<split>.txt`
    pub fn split_file(&self, split: &str) -> PathBuf {
        self.split_dir().join(format!("{}.txt", split))
    }

    /// `ImageSets/Main/<class>_<split>.txt`
    pub fn class_split_file(&self, class: &str, split: &str) -> PathBuf {
        self.split_dir().join(format!("{}_{}.txt", class, split))
    }

    pub fn image_file(&self, image_id: &str) -> PathBuf {
        self.dir.join("JPEGImages").join(format!("{}.jpg", image_id))
    }

    pub fn annotation_file(&self, image_id: &str) -> PathBuf {
        self.dir
            .join("Annotations")
            .join(format!("{}.xml", image_id))
    }
}
