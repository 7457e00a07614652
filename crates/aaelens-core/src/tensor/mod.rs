//! Dense CPU tensor
//!
//! `Tensor<T>` owns a standard-layout `ArrayD<T>` together with its `Shape`.
//! Ops borrow it through [`Tensor::array`] or [`Tensor::view2`].

mod creation;

use crate::{Result, Shape, TensorError};
use scirs2_core::ndarray::{ArrayD, ArrayView2, Axis, Ix2, IxDyn};

#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<T> {
    pub(crate) data: ArrayD<T>,
    pub(crate) shape: Shape,
}

impl<T> Tensor<T> {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_slice()
    }

    /// Borrow the underlying ndarray
    pub fn array(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn numel(&self) -> usize {
        self.shape.size()
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    /// Get the value at a specific index
    pub fn get(&self, index: &[usize]) -> Option<T>
    where
        T: Clone,
    {
        if index.len() != self.rank() {
            return None;
        }
        self.data.get(index).cloned()
    }

    /// Copy the elements out in row-major order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.iter().cloned().collect()
    }

    /// Number of rows of a 2-D tensor
    pub fn rows_count(&self) -> Result<usize> {
        self.matrix_dims("rows_count").map(|(rows, _)| rows)
    }

    pub(crate) fn matrix_dims(&self, operation: &str) -> Result<(usize, usize)> {
        self.shape.as_matrix().ok_or_else(|| {
            TensorError::invalid_shape(operation, "expected a 2-D tensor", self.shape.dims())
        })
    }

    /// Borrow a 2-D tensor as `[rows, cols]`
    pub fn view2(&self, operation: &str) -> Result<ArrayView2<'_, T>> {
        self.data.view().into_dimensionality::<Ix2>().map_err(|_| {
            TensorError::invalid_shape(operation, "expected a 2-D tensor", self.shape.dims())
        })
    }

    /// Reshape into `shape`; the element count must not change
    pub fn reshape(&self, shape: &[usize]) -> Result<Self>
    where
        T: Clone,
    {
        let new_size: usize = shape.iter().product();
        if new_size != self.numel() {
            return Err(TensorError::shape_mismatch(
                "reshape",
                &format!("{} elements", self.numel()),
                &format!("{new_size} elements for {shape:?}"),
            ));
        }
        let reshaped = self
            .data
            .clone()
            .into_shape_with_order(IxDyn(shape))
            .map_err(|e| TensorError::invalid_shape_simple(e.to_string()))?;
        Ok(Self::from_array(reshaped))
    }

    /// Copy of row `index` of a 2-D tensor, kept 2-D as `[1, cols]`
    pub fn row(&self, index: usize) -> Result<Self>
    where
        T: Clone,
    {
        self.select_rows(&[index])
    }

    /// Gather rows of a 2-D tensor into a new `[indices.len(), cols]` tensor
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self>
    where
        T: Clone,
    {
        let view = self.view2("select_rows")?;
        let rows = view.nrows();
        if let Some(index) = indices.iter().find(|&&i| i >= rows) {
            return Err(TensorError::invalid_argument_op(
                "select_rows",
                &format!("row {index} out of bounds for {rows} rows"),
            ));
        }
        Ok(Self::from_array(view.select(Axis(0), indices).into_dyn()))
    }

    pub(crate) fn from_parts(data: ArrayD<T>) -> Self {
        let shape = Shape::from_slice(data.shape());
        Self { data, shape }
    }

    /// Wrap an existing ndarray
    pub fn from_array(data: ArrayD<T>) -> Self
    where
        T: Clone,
    {
        if data.is_standard_layout() {
            Self::from_parts(data)
        } else {
            Self::from_parts(data.as_standard_layout().into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rows() -> Result<()> {
        let t = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0], &[3, 2])?;
        let picked = t.select_rows(&[2, 0])?;
        assert_eq!(picked.shape().dims(), &[2, 2]);
        assert_eq!(picked.to_vec(), vec![5.0, 6.0, 1.0, 2.0]);
        assert!(t.select_rows(&[3]).is_err());
        Ok(())
    }

    #[test]
    fn test_reshape_keeps_order() -> Result<()> {
        let t = Tensor::from_vec((0..6).map(|v| v as f32).collect(), &[2, 3])?;
        let r = t.reshape(&[3, 2])?;
        assert_eq!(r.get(&[2, 1]), Some(5.0));
        assert!(t.reshape(&[4, 2]).is_err());
        Ok(())
    }
}
