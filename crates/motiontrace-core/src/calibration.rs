use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::rect::Region;

/// Physical length per pixel, from a line of known length drawn on a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    units_per_pixel: f64,
}

impl Scale {
    /// `start` and `end` are pixel coordinates of the line's ends.
    pub fn from_points(start: (f64, f64), end: (f64, f64), known_length: f64) -> Result<Self> {
        if !(known_length.is_finite() && known_length > 0.0) {
            return Err(Error::invalid_input(format!(
                "known length must be positive, got {known_length}"
            )));
        }
        let pixels = (end.0 - start.0).hypot(end.1 - start.1);
        if !(pixels.is_finite() && pixels > 0.0) {
            return Err(Error::invalid_input("scale line has zero length, draw it again"));
        }
        Ok(Self {
            units_per_pixel: known_length / pixels,
        })
    }

    pub fn units_per_pixel(&self) -> f64 {
        self.units_per_pixel
    }

    pub fn to_units(&self, pixels: f64) -> f64 {
        pixels * self.units_per_pixel
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    NoRegion,
    OneRegion,
    /// Both regions selected, scale still missing.
    BothRegions,
    Calibrated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationInput {
    FirstRegion(Region),
    SecondRegion(Region),
    Scale(Scale),
}

/// Outcome of applying one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: CalibrationState,
    /// True only on the step that entered `Calibrated`.
    pub proceed: bool,
}

/// Operator-supplied calibration collected across UI steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calibration {
    first_region: Option<Region>,
    second_region: Option<Region>,
    scale: Option<Scale>,
}

impl Calibration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CalibrationState {
        match (self.first_region, self.second_region, self.scale) {
            (Some(_), Some(_), Some(_)) => CalibrationState::Calibrated,
            (Some(_), Some(_), None) => CalibrationState::BothRegions,
            (None, None, _) => CalibrationState::NoRegion,
            _ => CalibrationState::OneRegion,
        }
    }

    /// Record an input; re-selecting a region or redrawing the scale replaces the old value.
    pub fn apply(&mut self, input: CalibrationInput) -> Transition {
        let before = self.state();
        match input {
            CalibrationInput::FirstRegion(region) => self.first_region = Some(region),
            CalibrationInput::SecondRegion(region) => self.second_region = Some(region),
            CalibrationInput::Scale(scale) => self.scale = Some(scale),
        }
        let state = self.state();
        let proceed = state == CalibrationState::Calibrated && before != CalibrationState::Calibrated;

        debug!(?input, ?before, ?state, "calibration input applied");
        if proceed {
            info!("calibration complete");
        }

        Transition { state, proceed }
    }

    pub fn first_region(&self) -> Option<Region> {
        self.first_region
    }

    pub fn second_region(&self) -> Option<Region> {
        self.second_region
    }

    pub fn scale(&self) -> Option<Scale> {
        self.scale
    }
}
