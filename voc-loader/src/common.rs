pub use anyhow::{format_err, Context as _, Result};
pub use derivative::Derivative;
pub use image::RgbImage;
pub use indexmap::{IndexMap, IndexSet};
pub use itertools::Itertools as _;
pub use log::{debug, trace};
pub use ndarray::Array3;
pub use serde::{Deserialize, Serialize};
pub use std::{
    convert::Infallible,
    fmt::{self, Debug, Display},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
