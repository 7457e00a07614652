use crate::{Result, Tensor};
use scirs2_core::ndarray::Axis;
use scirs2_core::num_traits::Float;

pub fn relu<T: Float>(x: &Tensor<T>) -> Result<Tensor<T>> {
    let zero = T::zero();
    Ok(Tensor::from_array(x.array().mapv(|v| if v > zero { v } else { zero })))
}

pub fn sigmoid<T: Float>(x: &Tensor<T>) -> Result<Tensor<T>> {
    let one = T::one();
    Ok(Tensor::from_array(x.array().mapv(|v| one / (one + (-v).exp()))))
}

pub fn tanh<T: Float>(x: &Tensor<T>) -> Result<Tensor<T>> {
    Ok(Tensor::from_array(x.array().mapv(T::tanh)))
}

/// Row-wise softmax of a 2-D tensor
pub fn softmax<T: Float>(x: &Tensor<T>) -> Result<Tensor<T>> {
    let view = x.view2("softmax")?;
    // shift by the row max so exp never overflows
    let max = view
        .fold_axis(Axis(1), T::neg_infinity(), |&acc, &v| acc.max(v))
        .insert_axis(Axis(1));
    let exps = (&view - &max).mapv(T::exp);
    let sums = exps.sum_axis(Axis(1)).insert_axis(Axis(1));
    Ok(Tensor::from_array((exps / &sums).into_dyn()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_relu_and_sigmoid() -> Result<()> {
        let x = Tensor::from_vec(vec![-2.0f32, 0.0, 3.0], &[3])?;
        assert_eq!(relu(&x)?.to_vec(), vec![0.0, 0.0, 3.0]);
        let s = sigmoid(&x)?.to_vec();
        assert_relative_eq!(s[1], 0.5);
        assert!(s[0] < 0.5 && s[2] > 0.5);
        Ok(())
    }

    #[test]
    fn test_softmax_rows_sum_to_one() -> Result<()> {
        let x = Tensor::from_vec(vec![1.0f32, 2.0, 3.0, 1000.0, 1000.0, 1000.0], &[2, 3])?;
        let s = softmax(&x)?.to_vec();
        assert_relative_eq!(s[0] + s[1] + s[2], 1.0, epsilon = 1e-6);
        assert!(s[2] > s[1] && s[1] > s[0]);
        for v in &s[3..] {
            assert_relative_eq!(*v, 1.0 / 3.0, epsilon = 1e-6);
        }
        Ok(())
    }
}
