use crate::common::*;

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug,
{
    /// The list of class names of the dataset.
    fn classes(&self) -> &IndexSet<String>;
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    type Record;

    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Get the nth record in the dataset.
    fn nth(&self, index: usize) -> Result<Self::Record>;
}
