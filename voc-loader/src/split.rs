//! Split membership files under `ImageSets/Main`.

use crate::{common::*, error::DatasetError, layout::VocLayout};

const ALL_CLASSES: &str = "all";
const POSITIVE_FLAG: &str = "1";

/// Restricts which membership file of a split is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassSelector {
    /// Every image of the split, from `<split>.txt`.
    All,
    /// Images flagged positive in `<class>_<split>.txt`.
    Class(String),
}

impl Default for ClassSelector {
    fn default() -> Self {
        Self::All
    }
}

impl FromStr for ClassSelector {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(text.to_owned().into())
    }
}

impl From<String> for ClassSelector {
    fn from(text: String) -> Self {
        if text == ALL_CLASSES {
            Self::All
        } else {
            Self::Class(text)
        }
    }
}

impl From<ClassSelector> for String {
    fn from(selector: ClassSelector) -> Self {
        selector.to_string()
    }
}

impl Display for ClassSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_CLASSES),
            Self::Class(class) => write!(f, "{}", class),
        }
    }
}

/// Load the ordered image identifiers of a split.
///
/// The order of the file is kept, duplicates included.
pub fn load_split(
    layout: &VocLayout,
    selector: &ClassSelector,
    split: &str,
) -> Result<Vec<String>> {
    let path = match selector {
        ClassSelector::All => layout.split_file(split),
        ClassSelector::Class(class) => layout.class_split_file(class, split),
    };
    let text = fs::read_to_string(&path)
        .with_context(|| format!("failed to read split file '{}'", path.display()))?;

    let image_ids = match selector {
        ClassSelector::All => parse_split(&text),
        ClassSelector::Class(_) => parse_class_split(&text, &path)?,
    };
    debug!(
        "loaded {} image ids from '{}'",
        image_ids.len(),
        path.display()
    );

    Ok(image_ids)
}

/// Parse a class-agnostic split. Each non-empty line is one identifier.
pub fn parse_split(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Parse a per-class split, keeping identifiers whose flag is exactly `1`.
///
/// The `path` only serves error messages.
pub fn parse_class_split(text: &str, path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();

    text.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(image_id), Some(flag)) => {
                    (flag == POSITIVE_FLAG).then(|| Ok(image_id.to_owned()))
                }
                _ => Some(Err(DatasetError::MalformedSplitLine {
                    path: path.to_owned(),
                    line_no: index + 1,
                    line: line.to_owned(),
                }
                .into())),
            }
        })
        .try_collect()
}
