//! Configuration validation.
//!
//! [`validate_config`] checks every field and returns all problems found,
//! so a user fixing a file sees the full list in one go.

use thiserror::Error;

use grundton_core::{MAX_PEAKING, PitchDetector};
use grundton_synth::Waveform;
use grundton_tracker::{CatalogError, GUITAR, StringProfile};

use crate::config::TrackerConfig;

/// A single configuration problem.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range.
    #[error("'{field}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted key, e.g. `audio.block_size`.
        field: String,
        /// The offending value.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Waveform name not recognised.
    #[error("unknown waveform '{0}' (expected one of: {names})", names = waveform_names())]
    UnknownWaveform(String),

    /// Two values that must be ordered are not.
    #[error("'{field}': {reason}")]
    Inconsistent {
        /// Dotted key of the second value.
        field: String,
        /// What is wrong.
        reason: String,
    },

    /// An entry of the `strings` table.
    #[error("strings[{index}]: {source}")]
    StringBand {
        /// Position in the table.
        index: usize,
        /// Band problem.
        source: CatalogError,
    },
}

fn waveform_names() -> String {
    Waveform::ALL.map(Waveform::name).join(", ")
}

#[derive(Default)]
struct Checks {
    errors: Vec<ValidationError>,
}

impl Checks {
    fn range(&mut self, field: &str, value: f64, min: f64, max: f64) {
        // NaN fails `contains` too.
        if !(min..=max).contains(&value) {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
    }

    fn ensure(&mut self, ok: bool, field: &str, reason: impl Into<String>) {
        if !ok {
            self.errors.push(ValidationError::Inconsistent {
                field: field.to_string(),
                reason: reason.into(),
            });
        }
    }
}

/// Every problem in `config`. Empty when the configuration is usable.
pub fn validate_config(config: &TrackerConfig) -> Vec<ValidationError> {
    let mut checks = Checks::default();

    let audio = &config.audio;
    checks.range("audio.sample_rate", f64::from(audio.sample_rate), 8000.0, 192000.0);
    checks.range("audio.block_size", audio.block_size as f64, 1.0, 4096.0);
    let nyquist = f64::from(audio.sample_rate) * 0.5;

    let detector = &config.detector;
    checks.range("detector.threshold_db", detector.threshold_db, -120.0, 0.0);
    checks.range("detector.envelope_hold_periods", detector.envelope_hold_periods, 0.05, 8.0);

    let cascade = &config.cascade;
    checks.range("cascade.highpass_stages", f64::from(cascade.highpass_stages), 1.0, 2.0);
    checks.range("cascade.lowpass_stages", f64::from(cascade.lowpass_stages), 1.0, 2.0);
    checks.range("cascade.peaking", cascade.peaking.len() as f64, 0.0, MAX_PEAKING as f64);
    for (i, band) in cascade.peaking.iter().enumerate() {
        checks.range(&format!("cascade.peaking[{i}].frequency"), band.frequency, 20.0, nyquist.max(20.0));
        checks.range(&format!("cascade.peaking[{i}].gain_db"), band.gain_db, -24.0, 24.0);
        checks.range(&format!("cascade.peaking[{i}].q"), band.q, 0.1, 20.0);
    }

    let c = &config.conditioner;
    checks.range("conditioner.attack", c.attack, 0.0, 1.0);
    checks.range("conditioner.release", c.release, 0.0, 5.0);
    checks.range("conditioner.gate_onset_db", c.gate_onset_db, -120.0, 0.0);
    checks.range("conditioner.gate_release_db", c.gate_release_db, -120.0, 0.0);
    checks.ensure(
        c.gate_release_db <= c.gate_onset_db,
        "conditioner.gate_release_db",
        "gate release must not be above gate onset",
    );
    checks.range("conditioner.compressor_threshold_db", c.compressor_threshold_db, -120.0, 0.0);
    checks.range("conditioner.compressor_ratio", c.compressor_ratio, 1.0, 100.0);
    checks.range("conditioner.makeup_gain_db", c.makeup_gain_db, -24.0, 48.0);

    let o = &config.oscillators;
    for name in &o.waveforms {
        if Waveform::from_name(name).is_none() {
            checks.errors.push(ValidationError::UnknownWaveform(name.clone()));
        }
    }
    checks.range("oscillators.baseline_amplitude", o.baseline_amplitude, 0.0, 1.0);

    let cv = &config.cv;
    checks.range("cv.f_min", cv.f_min, 1.0, 20000.0);
    checks.range("cv.f_max", cv.f_max, 1.0, 20000.0);
    checks.ensure(cv.f_max > cv.f_min, "cv.f_max", "must be above cv.f_min");
    checks.range("cv.full_scale", f64::from(cv.full_scale), 1.0, f64::from(u16::MAX));

    for (index, entry) in config.strings.iter().enumerate() {
        if let Err(source) = StringProfile::new(entry.name.clone(), entry.low_hz, entry.high_hz) {
            checks.errors.push(ValidationError::StringBand { index, source });
        }
    }
    let floor = PitchDetector::lowest_detectable(audio.sample_rate as f32);
    let lows: Vec<(usize, f32)> = if config.strings.is_empty() {
        GUITAR.iter().map(StringProfile::low_hz).enumerate().collect()
    } else {
        config.strings.iter().map(|s| s.low_hz).enumerate().collect()
    };
    for (index, low_hz) in lows {
        checks.ensure(
            low_hz.is_nan() || low_hz >= floor,
            &format!("strings[{index}].low_hz"),
            format!("{low_hz} Hz is below the lowest detectable {floor:.1} Hz at {} Hz", audio.sample_rate),
        );
    }

    let strings = config.string_count();
    checks.ensure(strings >= 2, "strings", format!("need at least 2 strings, got {strings}"));
    checks.range(
        "selection.initial_base",
        config.selection.initial_base as f64,
        0.0,
        strings.saturating_sub(2) as f64,
    );

    checks.errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PeakingEntry, StringEntry};

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&TrackerConfig::default()).is_empty());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = TrackerConfig::default();
        config.audio.block_size = 0;
        config.detector.threshold_db = 6.0;
        config.oscillators.waveforms[1] = "noise".to_string();
        config.cv.f_max = 10.0;

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.contains(&ValidationError::UnknownWaveform("noise".to_string())));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::OutOfRange { field, .. } if field == "audio.block_size")));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::Inconsistent { field, .. } if field == "cv.f_max")));
    }

    #[test]
    fn bands_must_fit_the_lag_search() {
        let mut config = TrackerConfig::default();
        config.audio.sample_rate = 192_000;
        let errors = validate_config(&config);
        // The floor is about 140.7 Hz here: e, A and both wide bands fall below it.
        let fields: Vec<&str> = errors
            .iter()
            .filter_map(|e| match e {
                ValidationError::Inconsistent { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert_eq!(fields, ["strings[0].low_hz", "strings[1].low_hz", "strings[6].low_hz", "strings[7].low_hz"]);

        let mut bass = TrackerConfig::default();
        bass.strings = vec![
            StringEntry {
                name: "B".to_string(),
                low_hz: 30.87,
                high_hz: 130.8,
            },
            StringEntry {
                name: "E".to_string(),
                low_hz: 41.2,
                high_hz: 174.6,
            },
        ];
        let errors = validate_config(&bass);
        assert!(matches!(&errors[..], [ValidationError::Inconsistent { field, .. }] if field == "strings[0].low_hz"), "{errors:?}");
    }

    #[test]
    fn nan_is_out_of_range() {
        let mut config = TrackerConfig::default();
        config.oscillators.baseline_amplitude = f64::NAN;
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn gate_thresholds_must_be_ordered() {
        let mut config = TrackerConfig::default();
        config.conditioner.gate_release_db = -20.0;
        let errors = validate_config(&config);
        assert!(matches!(&errors[..], [ValidationError::Inconsistent { field, .. }] if field == "conditioner.gate_release_db"));
    }

    #[test]
    fn too_many_peaking_bands() {
        let mut config = TrackerConfig::default();
        let band = PeakingEntry {
            frequency: 300.0,
            gain_db: 2.0,
            q: 1.0,
        };
        config.cascade.peaking = vec![band; 3];
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn initial_base_bounded_by_catalog() {
        let mut config = TrackerConfig::default();
        config.selection.initial_base = 6;
        assert!(validate_config(&config).is_empty());
        config.selection.initial_base = 7;
        assert_eq!(validate_config(&config).len(), 1);
    }

    #[test]
    fn bad_string_band_is_located() {
        let mut config = TrackerConfig::default();
        config.strings = vec![
            StringEntry {
                name: "low".to_string(),
                low_hz: 40.0,
                high_hz: 160.0,
            },
            StringEntry {
                name: "flipped".to_string(),
                low_hz: 300.0,
                high_hz: 100.0,
            },
        ];
        let errors = validate_config(&config);
        assert!(matches!(&errors[..], [ValidationError::StringBand { index: 1, .. }]), "{errors:?}");
        assert!(errors[0].to_string().contains("flipped"));
    }

    #[test]
    fn unknown_waveform_lists_choices() {
        let msg = ValidationError::UnknownWaveform("noise".to_string()).to_string();
        assert!(msg.contains("blep-saw"), "{msg}");
    }
}
