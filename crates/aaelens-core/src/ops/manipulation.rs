use crate::{Result, Tensor, TensorError};
use scirs2_core::ndarray::{concatenate, Axis};

/// Concatenate 2-D tensors along `axis` (0 stacks rows, 1 joins columns)
pub fn concat<T: Clone>(tensors: &[&Tensor<T>], axis: usize) -> Result<Tensor<T>> {
    if tensors.is_empty() {
        return Err(TensorError::invalid_argument_op("concat", "no tensors given"));
    }
    if axis > 1 {
        return Err(TensorError::invalid_axis("concat", axis, 2));
    }

    let views = tensors
        .iter()
        .map(|t| t.view2("concat"))
        .collect::<Result<Vec<_>>>()?;
    let joined = concatenate(Axis(axis), &views).map_err(|e| {
        let shapes: Vec<String> = tensors.iter().map(|t| t.shape().to_string()).collect();
        TensorError::shape_mismatch(
            "concat",
            &format!("equal extents off axis {axis}"),
            &format!("{} ({e})", shapes.join(", ")),
        )
    })?;
    Ok(Tensor::from_array(joined.into_dyn()))
}

/// Column `index` of a 2-D tensor as a vector
pub fn column<T: Clone>(x: &Tensor<T>, index: usize) -> Result<Vec<T>> {
    let view = x.view2("column")?;
    if index >= view.ncols() {
        return Err(TensorError::invalid_argument_op(
            "column",
            &format!("column {index} out of bounds for {} columns", view.ncols()),
        ));
    }
    Ok(view.column(index).to_vec())
}

/// Split a 2-D tensor into its rows
pub fn rows<T: Clone>(x: &Tensor<T>) -> Result<Vec<Vec<T>>> {
    Ok(x.view2("rows")?.outer_iter().map(|row| row.to_vec()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_columns() -> Result<()> {
        let y = Tensor::from_vec(vec![1.0f32, 0.0, 0.0, 1.0], &[2, 2])?;
        let z = Tensor::from_vec(vec![0.5f32, -0.5], &[2, 1])?;
        let joined = concat(&[&y, &z], 1)?;
        assert_eq!(joined.shape().dims(), &[2, 3]);
        assert_eq!(joined.to_vec(), vec![1.0, 0.0, 0.5, 0.0, 1.0, -0.5]);
        Ok(())
    }

    #[test]
    fn test_concat_with_empty_columns() -> Result<()> {
        let y = Tensor::from_vec(vec![1.0f32, 0.0], &[1, 2])?;
        let z = Tensor::<f32>::zeros(&[1, 0]);
        assert_eq!(concat(&[&y, &z], 1)?.to_vec(), vec![1.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_concat_row_mismatch() {
        let a = Tensor::<f32>::zeros(&[2, 2]);
        let b = Tensor::<f32>::zeros(&[3, 1]);
        assert!(concat(&[&a, &b], 1).is_err());
        assert!(concat(&[&a, &b], 2).is_err());
    }

    #[test]
    fn test_concat_rows() -> Result<()> {
        let a = Tensor::from_vec(vec![1.0f32, 2.0], &[1, 2])?;
        let b = Tensor::from_vec(vec![3.0f32, 4.0], &[1, 2])?;
        let stacked = concat(&[&a, &b], 0)?;
        assert_eq!(stacked.shape().dims(), &[2, 2]);
        Ok(())
    }

    #[test]
    fn test_column() -> Result<()> {
        let x = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 4.0], &[2, 2])?;
        assert_eq!(column(&x, 0)?, vec![1.0, 3.0]);
        assert!(column(&x, 2).is_err());
        Ok(())
    }
}
