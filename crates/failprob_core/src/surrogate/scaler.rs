use nalgebra::DMatrix;

use crate::error::FitError;

/// Per-feature standardization to zero mean and unit variance
///
/// Uses the population variance. Constant features keep a scale of 1.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &DMatrix<f64>) -> Result<Self, FitError> {
        if x.nrows() == 0 {
            return Err(FitError::EmptyTrainingSet);
        }
        let rows = x.nrows() as f64;

        let mut mean = Vec::with_capacity(x.ncols());
        let mut scale = Vec::with_capacity(x.ncols());
        for column in x.column_iter() {
            let mu = column.sum() / rows;
            let var = column.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / rows;
            let sd = var.sqrt();
            mean.push(mu);
            scale.push(if sd < 10.0 * f64::EPSILON { 1.0 } else { sd });
        }

        Ok(Self { mean, scale })
    }

    pub fn transform_row(&self, x: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (mu, sd))| (v - mu) / sd)
            .collect()
    }

    pub fn transform(&self, x: &DMatrix<f64>) -> DMatrix<f64> {
        DMatrix::from_fn(x.nrows(), x.ncols(), |row, col| {
            (x[(row, col)] - self.mean[col]) / self.scale[col]
        })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardizes_columns() {
        let x = DMatrix::from_row_slice(4, 2, &[1.0, 5.0, 2.0, 5.0, 3.0, 5.0, 4.0, 5.0]);
        let scaler = StandardScaler::fit(&x).unwrap();

        assert!((scaler.mean()[0] - 2.5).abs() < 1e-12);
        assert!((scaler.scale()[0] - 1.25_f64.sqrt()).abs() < 1e-12);
        // Constant column is centered but not rescaled
        assert_eq!(scaler.scale()[1], 1.0);

        let z = scaler.transform(&x);
        let col_mean = z.column(0).sum() / 4.0;
        let col_var = z.column(0).iter().map(|v| v * v).sum::<f64>() / 4.0;
        assert!(col_mean.abs() < 1e-12);
        assert!((col_var - 1.0).abs() < 1e-12);
        assert!(z.column(1).iter().all(|v| *v == 0.0));

        let row = scaler.transform_row(&[4.0, 5.0]);
        assert!((row[0] - z[(3, 0)]).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input() {
        let x = DMatrix::<f64>::zeros(0, 3);
        assert_eq!(StandardScaler::fit(&x), Err(FitError::EmptyTrainingSet));
    }
}
