//! Dataset configuration format.

use crate::{common::*, layout::VocLayout, split::ClassSelector};

/// Location and selection of a VOC split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// The directory containing `VOCdevkit`.
    pub dataset_dir: PathBuf,
    /// The release year, such as `2007` or `2012`.
    pub year: String,
    /// Either `all` or a single class name.
    #[serde(default)]
    pub class: ClassSelector,
    /// The split name, such as `trainval` or `test`.
    pub split: String,
}

impl DatasetConfig {
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config = json5::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn layout(&self) -> VocLayout {
        VocLayout::new(&self.dataset_dir, &self.year)
    }
}
