use crate::{Result, Tensor, TensorError};
use scirs2_core::ndarray::{ArrayView2, Axis};
use scirs2_core::num_traits::Float;

/// Rows of `x` for a reduction over `axis`; only `axis = 1` is supported
fn reduced_rows<'a, T>(x: &'a Tensor<T>, axis: usize, operation: &str) -> Result<ArrayView2<'a, T>> {
    let view = x.view2(operation)?;
    if axis != 1 {
        return Err(TensorError::invalid_axis(operation, axis, x.rank()));
    }
    if view.ncols() == 0 {
        return Err(TensorError::invalid_argument_op(
            operation,
            "cannot reduce over zero columns",
        ));
    }
    Ok(view)
}

/// Index of the largest value in each row of a 2-D tensor; ties resolve to the first index
pub fn argmax<T: Float>(x: &Tensor<T>, axis: usize) -> Result<Vec<usize>> {
    let view = reduced_rows(x, axis, "argmax")?;
    let indices = view.map_axis(Axis(1), |row| {
        row.indexed_iter()
            .fold(0, |best, (i, &v)| if v > row[best] { i } else { best })
    });
    Ok(indices.to_vec())
}

/// Largest value in each row of a 2-D tensor
pub fn max<T: Float>(x: &Tensor<T>, axis: usize) -> Result<Vec<T>> {
    let view = reduced_rows(x, axis, "max")?;
    Ok(view
        .fold_axis(Axis(1), T::neg_infinity(), |&acc, &v| acc.max(v))
        .to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_first_on_tie() -> Result<()> {
        let x = Tensor::from_vec(vec![0.1f32, 0.7, 0.2, 0.5, 0.5, 0.0], &[2, 3])?;
        assert_eq!(argmax(&x, 1)?, vec![1, 0]);
        Ok(())
    }

    #[test]
    fn test_max_rows() -> Result<()> {
        let x = Tensor::from_vec(vec![0.1f32, 0.7, 0.2, -3.0, -1.0, -2.0], &[2, 3])?;
        assert_eq!(max(&x, 1)?, vec![0.7, -1.0]);
        assert!(max(&x, 0).is_err());
        Ok(())
    }
}
