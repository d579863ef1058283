//! Core traits shared by batch feature transformers.

use crate::error::Result;
use crate::primitives::FeatureVector;

/// Trait for transformers fitted on a batch of feature vectors.
///
/// # Examples
///
/// ```
/// use clinical_decision::prelude::*;
///
/// let batch = vec![
///     FeatureVector::new().with("age", 20.0),
///     FeatureVector::new().with("age", 60.0),
/// ];
/// let mut scaler = MinMaxScaler::new();
/// let scaled = scaler.fit_transform(&batch).unwrap();
/// assert_eq!(scaled[1].get("age"), 1.0);
/// ```
pub trait Transformer {
    /// Fits the transformer to a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (empty batch).
    fn fit(&mut self, batch: &[FeatureVector]) -> Result<()>;

    /// Transforms a batch using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
        self.fit(batch)?;
        self.transform(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    // Divides every value by the batch-wide maximum
    struct MaxScaler {
        max: Option<f64>,
    }

    impl Transformer for MaxScaler {
        fn fit(&mut self, batch: &[FeatureVector]) -> Result<()> {
            if batch.is_empty() {
                return Err("empty batch".into());
            }
            let max = batch
                .iter()
                .flat_map(|v| v.iter().map(|(_, x)| x))
                .fold(f64::NEG_INFINITY, f64::max);
            self.max = Some(if max > 0.0 { max } else { 1.0 });
            Ok(())
        }

        fn transform(&self, batch: &[FeatureVector]) -> Result<Vec<FeatureVector>> {
            let max = self.max.ok_or(EngineError::Other("not fitted".into()))?;
            Ok(batch
                .iter()
                .map(|v| v.iter().map(|(k, x)| (k, x / max)).collect())
                .collect())
        }
    }

    #[test]
    fn test_transformer_fit_transform_default() {
        let mut scaler = MaxScaler { max: None };
        let batch = vec![FeatureVector::new().with("a", 2.0).with("b", 4.0)];
        let out = scaler.fit_transform(&batch).expect("fit_transform");
        assert_eq!(out[0].get("a"), 0.5);
        assert_eq!(out[0].get("b"), 1.0);
        assert!(scaler.max.is_some());
    }

    #[test]
    fn test_transformer_transform_before_fit() {
        let scaler = MaxScaler { max: None };
        assert!(scaler.transform(&[FeatureVector::new()]).is_err());
    }

    #[test]
    fn test_transformer_fit_empty_batch() {
        let mut scaler = MaxScaler { max: None };
        assert!(scaler.fit(&[]).is_err());
    }
}
