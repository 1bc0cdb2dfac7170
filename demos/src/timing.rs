use std::time::{Duration, Instant};

use bitspin_rotate::{BitMatrix, RotateConfig, RotateError, Rotator, TileTranspose};
use serde::Serialize;
use tracing::{info, info_span, warn};

/// Largest side for which `--verify` also compares against the bit-by-bit rotation.
pub const NAIVE_CHECK_MAX_SIDE: usize = 1024;

/// What one harness run measured, in a form that serializes to JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub side: usize,
    pub kernel: &'static str,
    pub config: RotateConfig,
    pub seconds: Vec<f64>,
    pub best_seconds: f64,
    pub mean_seconds: f64,
    /// `None` when verification was not requested.
    pub verified: Option<bool>,
}

impl RunReport {
    #[must_use]
    pub fn new(
        side: usize,
        kernel: &'static str,
        config: RotateConfig,
        durations: &[Duration],
    ) -> Self {
        let seconds: Vec<f64> = durations.iter().map(Duration::as_secs_f64).collect();
        let best_seconds = seconds.iter().copied().fold(f64::INFINITY, f64::min);
        let mean_seconds = if seconds.is_empty() {
            0.0
        } else {
            seconds.iter().sum::<f64>() / seconds.len() as f64
        };
        Self {
            side,
            kernel,
            config,
            seconds,
            best_seconds,
            mean_seconds,
            verified: None,
        }
    }
}

/// Rotate `matrix` `repeat` times, timing each call.
pub fn time_rotations<K: TileTranspose>(
    rotator: &Rotator<K>,
    matrix: &mut BitMatrix,
    repeat: usize,
) -> Result<Vec<Duration>, RotateError> {
    let _span = info_span!("time_rotations", side = matrix.side(), repeat).entered();
    let mut durations = Vec::with_capacity(repeat);
    for run in 0..repeat {
        let start = Instant::now();
        matrix.rotate_with(rotator)?;
        let elapsed = start.elapsed();
        info!(run, seconds = elapsed.as_secs_f64(), "rotated");
        durations.push(elapsed);
    }
    Ok(durations)
}

/// Check `rotator` on a copy of `matrix`: four turns must restore it, and for small matrices a
/// single turn must agree with the bit-by-bit rotation.
pub fn verify<K: TileTranspose>(
    rotator: &Rotator<K>,
    matrix: &BitMatrix,
) -> Result<bool, RotateError> {
    let _span = info_span!("verify", side = matrix.side()).entered();
    let mut turned = matrix.clone();

    turned.rotate_with(rotator)?;
    if matrix.side() <= NAIVE_CHECK_MAX_SIDE && turned != matrix.rotated_naive() {
        warn!("single rotation disagrees with the bit-by-bit rotation");
        return Ok(false);
    }
    for _ in 0..3 {
        turned.rotate_with(rotator)?;
    }
    if turned != *matrix {
        warn!("four rotations did not restore the matrix");
        return Ok(false);
    }
    info!("rotation verified");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use bitspin_rotate::{ColumnRotate, DeltaSwap, Traversal};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn report_summarizes_durations() {
        let durations = [Duration::from_millis(30), Duration::from_millis(10)];
        let report = RunReport::new(64, "delta-swap", RotateConfig::default(), &durations);
        assert!((report.best_seconds - 0.010).abs() < 1e-9);
        assert!((report.mean_seconds - 0.020).abs() < 1e-9);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["side"], 64);
        assert_eq!(json["verified"], serde_json::Value::Null);
    }

    #[test]
    fn timing_rotates_the_matrix() {
        let mut rng = SmallRng::seed_from_u64(4);
        let original = BitMatrix::random(&mut rng, 256).unwrap();
        let mut matrix = original.clone();
        let rotator = Rotator::new(ColumnRotate, RotateConfig::serial(Traversal::RowMajor));
        let durations = time_rotations(&rotator, &mut matrix, 2).unwrap();
        assert_eq!(durations.len(), 2);

        let mut expected = original.rotated_naive().rotated_naive();
        assert_eq!(matrix, expected);
        expected.rotate();
        expected.rotate();
        assert_eq!(expected, original);
    }

    #[test]
    fn verify_accepts_both_kernels() {
        let mut rng = SmallRng::seed_from_u64(5);
        let matrix = BitMatrix::random(&mut rng, 192).unwrap();
        let config = RotateConfig::serial(Traversal::SuperBlock { tiles: 2 });
        assert_eq!(verify(&Rotator::new(ColumnRotate, config), &matrix), Ok(true));
        assert_eq!(verify(&Rotator::new(DeltaSwap, config), &matrix), Ok(true));
    }
}
