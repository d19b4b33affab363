//! Label containers and the dense label space used by the confusion matrix.

use crate::core::{
    error::{EvalError, Result},
    types::{DType, Label},
};
use ndarray::{Array1, ArrayView1};
use std::collections::BTreeMap;

/// A 1-D label sequence that remembers its element type.
///
/// Labels often arrive from deserialized or dynamically typed sources, so the
/// dtype is carried alongside the values and checked by the metrics that need
/// integer labels.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelData {
    /// 64-bit integer labels
    Int64(Array1<i64>),
    /// 32-bit integer labels
    Int32(Array1<i32>),
    /// 32-bit float values
    Float32(Array1<f32>),
    /// 64-bit float values
    Float64(Array1<f64>),
    /// Boolean values
    Bool(Array1<bool>),
}

impl LabelData {
    /// Element type of the stored values.
    pub fn dtype(&self) -> DType {
        match self {
            LabelData::Int64(_) => DType::Int64,
            LabelData::Int32(_) => DType::Int32,
            LabelData::Float32(_) => DType::Float32,
            LabelData::Float64(_) => DType::Float64,
            LabelData::Bool(_) => DType::Bool,
        }
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        match self {
            LabelData::Int64(a) => a.len(),
            LabelData::Int32(a) => a.len(),
            LabelData::Float32(a) => a.len(),
            LabelData::Float64(a) => a.len(),
            LabelData::Bool(a) => a.len(),
        }
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer labels widened to [`Label`], or an [`EvalError::InvalidType`]
    /// naming `parameter` when the dtype is not an integer type.
    pub fn to_labels(&self, parameter: &str) -> Result<Array1<Label>> {
        let dtype = self.dtype();
        if !dtype.is_integer() {
            return Err(EvalError::invalid_type(parameter, dtype.to_string()));
        }
        match self {
            LabelData::Int64(a) => Ok(a.clone()),
            LabelData::Int32(a) => Ok(a.mapv(Label::from)),
            other => Err(EvalError::invalid_type(parameter, other.dtype().to_string())),
        }
    }
}

impl From<Array1<i64>> for LabelData {
    fn from(values: Array1<i64>) -> Self {
        LabelData::Int64(values)
    }
}

impl From<ArrayView1<'_, i64>> for LabelData {
    fn from(values: ArrayView1<'_, i64>) -> Self {
        LabelData::Int64(values.to_owned())
    }
}

impl From<Vec<i64>> for LabelData {
    fn from(values: Vec<i64>) -> Self {
        LabelData::Int64(Array1::from_vec(values))
    }
}

impl From<&[i64]> for LabelData {
    fn from(values: &[i64]) -> Self {
        LabelData::Int64(Array1::from_vec(values.to_vec()))
    }
}

impl From<Vec<i32>> for LabelData {
    fn from(values: Vec<i32>) -> Self {
        LabelData::Int32(Array1::from_vec(values))
    }
}

impl From<Array1<i32>> for LabelData {
    fn from(values: Array1<i32>) -> Self {
        LabelData::Int32(values)
    }
}

impl From<Vec<f32>> for LabelData {
    fn from(values: Vec<f32>) -> Self {
        LabelData::Float32(Array1::from_vec(values))
    }
}

impl From<Array1<f32>> for LabelData {
    fn from(values: Array1<f32>) -> Self {
        LabelData::Float32(values)
    }
}

impl From<Vec<f64>> for LabelData {
    fn from(values: Vec<f64>) -> Self {
        LabelData::Float64(Array1::from_vec(values))
    }
}

impl From<Array1<f64>> for LabelData {
    fn from(values: Array1<f64>) -> Self {
        LabelData::Float64(values)
    }
}

impl From<Vec<bool>> for LabelData {
    fn from(values: Vec<bool>) -> Self {
        LabelData::Bool(Array1::from_vec(values))
    }
}

/// Sorted set of distinct labels with a dense index for each.
///
/// A space built with [`LabelSpace::from_observed`] only contains the labels
/// seen in that call, so its size and axis order change from call to call.
/// Use [`LabelSpace::contiguous`] or [`LabelSpace::from_labels`] when the
/// class universe is known ahead of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpace {
    labels: Vec<Label>,
    index: BTreeMap<Label, usize>,
}

impl LabelSpace {
    /// Build a space from arbitrary labels; duplicates are dropped and the
    /// result is sorted ascending.
    pub fn from_labels<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = Label>,
    {
        let index: BTreeMap<Label, usize> = labels
            .into_iter()
            .map(|label| (label, 0))
            .collect::<BTreeMap<_, _>>()
            .into_keys()
            .enumerate()
            .map(|(i, label)| (label, i))
            .collect();
        let labels = index.keys().copied().collect();
        Self { labels, index }
    }

    /// Union of the labels seen in a predicted and a true label sequence.
    pub fn from_observed(y_pred: &ArrayView1<'_, Label>, y_real: &ArrayView1<'_, Label>) -> Self {
        let space = Self::from_labels(y_pred.iter().chain(y_real.iter()).copied());
        log::debug!("label space: {:?}", space.labels);
        space
    }

    /// The fixed space `{0, 1, ..., num_classes - 1}`.
    pub fn contiguous(num_classes: usize) -> Self {
        Self::from_labels((0..num_classes as Label).collect::<Vec<_>>())
    }

    /// Number of labels in the space.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the space is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in ascending order; position is the dense index.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Dense index of `label`, if present.
    pub fn index_of(&self, label: Label) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// Label stored at dense index `index`.
    pub fn label_at(&self, index: usize) -> Option<Label> {
        self.labels.get(index).copied()
    }

    /// Whether `label` belongs to the space.
    pub fn contains(&self, label: Label) -> bool {
        self.index.contains_key(&label)
    }
}
