//! Confidence Calibrator Module
//!
//! Turns the ensemble composite into a bullish probability that never sits
//! in the neutral zone and never contradicts a clearly signed composite.

pub mod calibrator;

pub use calibrator::{
    CalibratedProbability, CalibrationInput, CompositeOverride, ProbabilityCalibrator, NEUTRAL_ZONE,
};
