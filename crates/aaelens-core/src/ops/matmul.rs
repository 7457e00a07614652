use crate::{Result, Tensor, TensorError};
use scirs2_core::ndarray::Array1;
use scirs2_core::num_traits::Float;

/// Matrix product of `a[m, k]` and `b[k, n]`
pub fn matmul<T: Float + 'static>(a: &Tensor<T>, b: &Tensor<T>) -> Result<Tensor<T>> {
    let lhs = a.view2("matmul")?;
    let rhs = b.view2("matmul")?;
    if lhs.ncols() != rhs.nrows() {
        return Err(TensorError::shape_mismatch(
            "matmul",
            &format!("[{}, _] on the right", lhs.ncols()),
            &b.shape().to_string(),
        ));
    }
    Ok(Tensor::from_array(lhs.dot(&rhs).into_dyn()))
}

/// Add `bias[n]` to every row of `a[m, n]`
pub fn add_row_broadcast<T: Float>(a: &Tensor<T>, bias: &Tensor<T>) -> Result<Tensor<T>> {
    let lhs = a.view2("add_row_broadcast")?;
    if bias.numel() != lhs.ncols() {
        return Err(TensorError::shape_mismatch(
            "add_row_broadcast",
            &format!("[{}]", lhs.ncols()),
            &bias.shape().to_string(),
        ));
    }
    let bias: Array1<T> = bias.array().iter().copied().collect();
    Ok(Tensor::from_array((&lhs + &bias).into_dyn()))
}

pub fn transpose<T: Clone>(a: &Tensor<T>) -> Result<Tensor<T>> {
    Ok(Tensor::from_array(a.view2("transpose")?.t().to_owned().into_dyn()))
}
