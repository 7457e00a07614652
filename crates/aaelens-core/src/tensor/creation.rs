//! Tensor construction

use super::Tensor;
use crate::{Result, TensorError};
use scirs2_core::ndarray::{Array1, ArrayD, IxDyn};
use scirs2_core::num_traits::{Float, One, Zero};

impl<T: Clone> Tensor<T> {
    /// Create a tensor from a row-major vector with the given shape
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        let total_elements: usize = shape.iter().product();
        if data.len() != total_elements {
            return Err(TensorError::invalid_shape_simple(format!(
                "Data length {} does not match shape {:?} (expected {} elements)",
                data.len(),
                shape,
                total_elements
            )));
        }

        let array = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| TensorError::invalid_shape_simple(e.to_string()))?;
        Ok(Self::from_parts(array))
    }

    /// Create a tensor where every element is `value`
    pub fn full(shape: &[usize], value: T) -> Self {
        Self::from_parts(ArrayD::from_elem(IxDyn(shape), value))
    }
}

impl<T: Clone + Zero> Tensor<T> {
    pub fn zeros(shape: &[usize]) -> Self {
        Self::full(shape, T::zero())
    }

    /// One-hot row vector of shape `[1, n]` with a one at `index`
    pub fn one_hot_row(n: usize, index: usize) -> Result<Self>
    where
        T: One,
    {
        if index >= n {
            return Err(TensorError::invalid_argument_op(
                "one_hot_row",
                &format!("index {index} out of range for {n} classes"),
            ));
        }
        let mut data = vec![T::zero(); n];
        data[index] = T::one();
        Self::from_vec(data, &[1, n])
    }
}

impl<T: Clone + One> Tensor<T> {
    pub fn ones(shape: &[usize]) -> Self {
        Self::full(shape, T::one())
    }
}

impl<T: Float> Tensor<T> {
    /// `steps` evenly spaced values over `[start, end]`, both ends included
    pub fn linspace(start: T, end: T, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(TensorError::invalid_argument_op(
                "linspace",
                "steps must be at least 1",
            ));
        }
        if steps == 1 {
            return Self::from_vec(vec![start], &[1]);
        }
        let denom = T::from(steps - 1).ok_or_else(|| {
            TensorError::invalid_argument_op("linspace", "step count not representable")
        })?;
        let step = (end - start) / denom;
        let values = Array1::from_shape_fn(steps, |i| {
            // pin the last value so rounding never overshoots `end`
            if i + 1 == steps {
                end
            } else {
                start + step * T::from(i).unwrap_or_else(T::zero)
            }
        });
        Ok(Self::from_parts(values.into_dyn()))
    }
}
