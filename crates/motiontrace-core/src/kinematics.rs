//! Finite-difference derivatives of sampled motion.
//!
//! Each derivative pairs adjacent samples and is stamped with the later time of
//! the pair, so differentiating twice composes: an `n`-sample series yields
//! `n-1` velocities at `times[1..]` and `n-2` accelerations at `times[2..]`.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::series::PositionSeries;

/// Derived values with the time each one is stamped at.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedSeries {
    pub values: Vec<f64>,
    pub times: Vec<f64>,
}

impl DerivedSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// First derivative of `values` with respect to `times`.
pub fn derive_velocity(values: &[f64], times: &[f64]) -> Result<DerivedSeries> {
    if values.len() != times.len() {
        return Err(Error::degenerate(format!(
            "{} values but {} timestamps",
            values.len(),
            times.len()
        )));
    }
    if values.len() < 2 {
        return Err(Error::degenerate(format!(
            "need at least 2 samples to differentiate, got {}",
            values.len()
        )));
    }
    check_times(times)?;

    let derived: Vec<f64> = values
        .windows(2)
        .zip(times.windows(2))
        .map(|(v, t)| (v[1] - v[0]) / (t[1] - t[0]))
        .collect();

    debug!(samples = values.len(), derived = derived.len(), "differentiated series");

    Ok(DerivedSeries {
        values: derived,
        times: times[1..].to_vec(),
    })
}

/// Second derivative: velocity differentiated once more.
pub fn derive_acceleration(values: &[f64], times: &[f64]) -> Result<DerivedSeries> {
    if values.len() < 3 {
        return Err(Error::degenerate(format!(
            "need at least 3 samples for acceleration, got {}",
            values.len()
        )));
    }
    let velocity = derive_velocity(values, times)?;
    derive_velocity(&velocity.values, &velocity.times)
}

fn check_times(times: &[f64]) -> Result<()> {
    if let Some(t) = times.iter().find(|t| !t.is_finite()) {
        return Err(Error::degenerate(format!("non-finite timestamp {t}")));
    }
    if let Some((i, pair)) = times.windows(2).enumerate().find(|(_, p)| p[1] <= p[0]) {
        return Err(Error::degenerate(format!(
            "timestamps must be strictly increasing: t[{}]={} then t[{}]={}",
            i,
            pair[0],
            i + 1,
            pair[1]
        )));
    }
    Ok(())
}

/// The quantities that can be plotted against time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    PositionX,
    PositionY,
    VelocityX,
    VelocityY,
    AccelerationX,
    AccelerationY,
}

/// Axis labels and title for a plotted quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotLabels {
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub title: &'static str,
}

/// Points ready for a scatter plot or table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub labels: PlotLabels,
}

impl Quantity {
    pub const ALL: [Quantity; 6] = [
        Quantity::PositionX,
        Quantity::PositionY,
        Quantity::VelocityX,
        Quantity::VelocityY,
        Quantity::AccelerationX,
        Quantity::AccelerationY,
    ];

    pub fn labels(self) -> PlotLabels {
        const TIME: &str = "Time (seconds)";
        let (y_label, title) = match self {
            Quantity::PositionX => ("X Coordinate", "X Coordinate vs Time"),
            Quantity::PositionY => ("Y Coordinate", "Y Coordinate vs Time"),
            Quantity::VelocityX => ("X Velocity (m/s)", "X Velocity vs Time"),
            Quantity::VelocityY => ("Y Velocity (m/s)", "Y Velocity vs Time"),
            Quantity::AccelerationX => ("X Acceleration (m/s²)", "X Acceleration vs Time"),
            Quantity::AccelerationY => ("Y Acceleration (m/s²)", "Y Acceleration vs Time"),
        };
        PlotLabels {
            x_label: TIME,
            y_label,
            title,
        }
    }

    /// Compute this quantity's points from a position series.
    pub fn evaluate(self, series: &PositionSeries) -> Result<PlotSeries> {
        let (times, values) = match self {
            Quantity::PositionX => (series.times.clone(), series.x.clone()),
            Quantity::PositionY => (series.times.clone(), series.y.clone()),
            Quantity::VelocityX => split(derive_velocity(&series.x, &series.times)?),
            Quantity::VelocityY => split(derive_velocity(&series.y, &series.times)?),
            Quantity::AccelerationX => split(derive_acceleration(&series.x, &series.times)?),
            Quantity::AccelerationY => split(derive_acceleration(&series.y, &series.times)?),
        };
        Ok(PlotSeries {
            times,
            values,
            labels: self.labels(),
        })
    }

    fn as_str(self) -> &'static str {
        match self {
            Quantity::PositionX => "position-x",
            Quantity::PositionY => "position-y",
            Quantity::VelocityX => "velocity-x",
            Quantity::VelocityY => "velocity-y",
            Quantity::AccelerationX => "acceleration-x",
            Quantity::AccelerationY => "acceleration-y",
        }
    }
}

fn split(d: DerivedSeries) -> (Vec<f64>, Vec<f64>) {
    (d.times, d.values)
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Quantity::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Quantity::ALL.iter().map(|q| q.as_str()).collect();
                Error::invalid_input(format!("unknown quantity '{s}', expected one of {}", known.join(", ")))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < EPS, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn squares_example() {
        let x = [0.0, 1.0, 4.0, 9.0];
        let t = [0.0, 1.0, 2.0, 3.0];

        let v = derive_velocity(&x, &t).unwrap();
        assert_close(&v.values, &[1.0, 3.0, 5.0]);
        assert_close(&v.times, &[1.0, 2.0, 3.0]);

        let a = derive_acceleration(&x, &t).unwrap();
        assert_close(&a.values, &[2.0, 2.0]);
        assert_close(&a.times, &[2.0, 3.0]);
    }

    #[test]
    fn linear_position_has_constant_velocity_and_zero_acceleration() {
        let t: Vec<f64> = [0.0, 0.1, 0.25, 0.3, 0.8, 1.7].to_vec();
        let x: Vec<f64> = t.iter().map(|t| 2.5 - 4.0 * t).collect();

        let v = derive_velocity(&x, &t).unwrap();
        assert_eq!(v.len(), t.len() - 1);
        for value in &v.values {
            assert!((value + 4.0).abs() < 1e-9, "{value}");
        }

        let a = derive_acceleration(&x, &t).unwrap();
        assert_eq!(a.len(), t.len() - 2);
        for value in &a.values {
            assert!(value.abs() < 1e-6, "{value}");
        }
    }

    #[test]
    fn too_few_samples() {
        assert!(matches!(derive_velocity(&[1.0], &[0.0]), Err(Error::DegenerateInput(_))));
        assert!(matches!(derive_velocity(&[], &[]), Err(Error::DegenerateInput(_))));
        assert!(matches!(
            derive_acceleration(&[1.0, 2.0], &[0.0, 1.0]),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn non_increasing_times_are_rejected() {
        let x = [0.0, 1.0, 2.0];
        assert!(matches!(derive_velocity(&x, &[0.0, 1.0, 1.0]), Err(Error::DegenerateInput(_))));
        assert!(matches!(derive_velocity(&x, &[0.0, 2.0, 1.0]), Err(Error::DegenerateInput(_))));
        assert!(matches!(
            derive_velocity(&x, &[0.0, f64::NAN, 1.0]),
            Err(Error::DegenerateInput(_))
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = derive_velocity(&[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, Error::DegenerateInput(_)));
    }

    #[test]
    fn quantity_round_trips_through_str() {
        for q in Quantity::ALL {
            assert_eq!(q.to_string().parse::<Quantity>().unwrap(), q);
        }
        assert!(matches!("speed".parse::<Quantity>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn evaluate_quantities() {
        let series = PositionSeries::new(
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 1.0, 4.0, 9.0],
            vec![5.0, 5.0, 5.0, 5.0],
        )
        .unwrap();

        let pos = Quantity::PositionY.evaluate(&series).unwrap();
        assert_eq!(pos.values, series.y);
        assert_eq!(pos.labels.title, "Y Coordinate vs Time");

        let vy = Quantity::VelocityY.evaluate(&series).unwrap();
        assert_close(&vy.values, &[0.0, 0.0, 0.0]);

        let ax = Quantity::AccelerationX.evaluate(&series).unwrap();
        assert_close(&ax.times, &[2.0, 3.0]);
        assert_close(&ax.values, &[2.0, 2.0]);
        assert_eq!(ax.labels.x_label, "Time (seconds)");
    }
}
