//! Configuration file format.

use serde::{Deserialize, Serialize};
use std::path::Path;

use grundton_core::{CascadeLayout, ConditionerConfig, MAX_PEAKING, PeakingBand};
use grundton_synth::Waveform;
use grundton_tracker::{
    CvRange, GUITAR, SecondaryCv, StringCatalog, StringProfile, SwitchPolicy, TrackerSettings,
};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Tracker configuration file.
///
/// Every section is optional; a missing section or key takes the built-in
/// default. An empty file therefore describes the stock module.
///
/// # TOML Format
///
/// ```toml
/// [audio]
/// sample_rate = 48000
/// block_size = 48
///
/// [detector]
/// threshold_db = -45.0
///
/// [conditioner]
/// enabled = true
/// gate_onset_db = -36.0
///
/// [oscillators]
/// waveforms = ["blep-tri", "blep-saw"]
///
/// [cv]
/// secondary = "pitch-b"
///
/// [selection]
/// switch_policy = "reset"
///
/// [[strings]]
/// name = "E"
/// low_hz = 41.2
/// high_hz = 174.6
///
/// [[strings]]
/// name = "A"
/// low_hz = 55.0
/// high_hz = 233.1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Sample rate and block size.
    pub audio: AudioSection,
    /// Pitch detector and envelope.
    pub detector: DetectorSection,
    /// Band-limiting cascade.
    pub cascade: CascadeSection,
    /// Signal conditioner.
    pub conditioner: ConditionerSection,
    /// Output oscillators.
    pub oscillators: OscillatorSection,
    /// CV outputs.
    pub cv: CvSection,
    /// String selection.
    pub selection: SelectionSection,
    /// String catalog. Empty means the built-in guitar catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strings: Vec<StringEntry>,
}

/// `[audio]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSection {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Frames per block.
    pub block_size: usize,
}

/// `[detector]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorSection {
    /// Input threshold in dBFS.
    pub threshold_db: f64,
    /// Envelope hold window in periods of the band's lowest note.
    pub envelope_hold_periods: f64,
}

/// `[cascade]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CascadeSection {
    /// High-pass sections, 1 or 2.
    pub highpass_stages: u8,
    /// Low-pass sections, 1 or 2.
    pub lowpass_stages: u8,
    /// Up to two peaking bands.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peaking: Vec<PeakingEntry>,
}

/// `[[cascade.peaking]]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PeakingEntry {
    /// Centre frequency in Hz.
    pub frequency: f64,
    /// Gain in dB.
    pub gain_db: f64,
    /// Bandwidth as Q.
    #[serde(default = "default_peaking_q")]
    pub q: f64,
}

fn default_peaking_q() -> f64 {
    1.0
}

/// `[conditioner]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConditionerSection {
    /// Conditioning active at startup.
    pub enabled: bool,
    /// Envelope attack in seconds.
    pub attack: f64,
    /// Envelope release in seconds.
    pub release: f64,
    /// Gate onset level in dB.
    pub gate_onset_db: f64,
    /// Gate release level in dB.
    pub gate_release_db: f64,
    /// Compressor threshold in dB.
    pub compressor_threshold_db: f64,
    /// Compression ratio.
    pub compressor_ratio: f64,
    /// Makeup gain in dB.
    pub makeup_gain_db: f64,
}

/// `[oscillators]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OscillatorSection {
    /// Startup waveform names, left then right.
    pub waveforms: [String; 2],
    /// Level when envelope gating is off.
    pub baseline_amplitude: f64,
    /// Let each channel's envelope drive its oscillator level.
    pub envelope_gating: bool,
}

/// `[cv]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CvSection {
    /// Frequency at code 0.
    pub f_min: f64,
    /// Frequency at full scale.
    pub f_max: f64,
    /// Largest DAC code.
    pub full_scale: u16,
    /// What DAC channel two carries.
    pub secondary: SecondaryOutput,
}

/// DAC channel two source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SecondaryOutput {
    /// Envelope of channel A.
    #[default]
    EnvelopeA,
    /// Pitch of channel B.
    PitchB,
}

/// `[selection]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SelectionSection {
    /// Catalog index of channel A at startup.
    pub initial_base: usize,
    /// Held pitch behaviour on string change.
    pub switch_policy: SwitchPolicyName,
}

/// Held pitch behaviour on string change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SwitchPolicyName {
    /// Keep the last pitch until the new string reports.
    #[default]
    Retain,
    /// Drop to 0 Hz on every change.
    Reset,
}

/// `[[strings]]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StringEntry {
    /// Display name.
    pub name: String,
    /// Lowest expected fundamental in Hz.
    pub low_hz: f32,
    /// Highest expected fundamental in Hz.
    pub high_hz: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::from_settings(&TrackerSettings::default())
    }
}

macro_rules! section_default {
    ($($section:ident => $field:ident),* $(,)?) => {
        $(impl Default for $section {
            fn default() -> Self {
                TrackerConfig::default().$field
            }
        })*
    };
}

section_default! {
    AudioSection => audio,
    DetectorSection => detector,
    CascadeSection => cascade,
    ConditionerSection => conditioner,
    OscillatorSection => oscillators,
    CvSection => cv,
    SelectionSection => selection,
}

impl TrackerConfig {
    /// File form of `settings`, with the built-in catalog.
    pub fn from_settings(settings: &TrackerSettings) -> Self {
        let c = &settings.conditioner;
        Self {
            audio: AudioSection {
                sample_rate: settings.sample_rate as u32,
                block_size: settings.block_size,
            },
            detector: DetectorSection {
                threshold_db: f64::from(settings.threshold_db),
                envelope_hold_periods: f64::from(settings.envelope_hold_periods),
            },
            cascade: CascadeSection {
                highpass_stages: settings.cascade.highpass_stages,
                lowpass_stages: settings.cascade.lowpass_stages,
                peaking: settings
                    .cascade
                    .peaking
                    .iter()
                    .flatten()
                    .map(|band| PeakingEntry {
                        frequency: f64::from(band.frequency),
                        gain_db: f64::from(band.gain_db),
                        q: f64::from(band.q),
                    })
                    .collect(),
            },
            conditioner: ConditionerSection {
                enabled: settings.conditioning_enabled,
                attack: f64::from(c.attack),
                release: f64::from(c.release),
                gate_onset_db: f64::from(c.gate_onset_db),
                gate_release_db: f64::from(c.gate_release_db),
                compressor_threshold_db: f64::from(c.compressor_threshold_db),
                compressor_ratio: f64::from(c.compressor_ratio),
                makeup_gain_db: f64::from(c.makeup_gain_db),
            },
            oscillators: OscillatorSection {
                waveforms: settings.initial_waveforms.map(|w| w.name().to_string()),
                baseline_amplitude: f64::from(settings.baseline_amplitude),
                envelope_gating: settings.envelope_gating,
            },
            cv: CvSection {
                f_min: f64::from(settings.cv.f_min),
                f_max: f64::from(settings.cv.f_max),
                full_scale: settings.cv.full_scale,
                secondary: match settings.secondary_cv {
                    SecondaryCv::EnvelopeA => SecondaryOutput::EnvelopeA,
                    SecondaryCv::PitchB => SecondaryOutput::PitchB,
                },
            },
            selection: SelectionSection {
                initial_base: settings.initial_base_index,
                switch_policy: match settings.switch_policy {
                    SwitchPolicy::RetainHeldPitch => SwitchPolicyName::Retain,
                    SwitchPolicy::ResetHeldPitch => SwitchPolicyName::Reset,
                },
            },
            strings: Vec::new(),
        }
    }

    /// Replace the string table with `catalog`.
    #[must_use]
    pub fn with_catalog(mut self, catalog: &StringCatalog) -> Self {
        self.strings = catalog
            .iter()
            .map(|p| StringEntry {
                name: p.name().to_string(),
                low_hz: p.low_hz(),
                high_hz: p.high_hz(),
            })
            .collect();
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = validate_config(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Number of strings in effect, built-in catalog included.
    pub fn string_count(&self) -> usize {
        if self.strings.is_empty() {
            GUITAR.len()
        } else {
            self.strings.len()
        }
    }

    /// Validated runtime settings.
    pub fn settings(&self) -> Result<TrackerSettings, ConfigError> {
        self.validate()?;

        let mut cascade = CascadeLayout {
            highpass_stages: self.cascade.highpass_stages,
            lowpass_stages: self.cascade.lowpass_stages,
            ..CascadeLayout::DOUBLE
        };
        for entry in self.cascade.peaking.iter().take(MAX_PEAKING) {
            cascade = cascade.with_peaking(PeakingBand {
                frequency: entry.frequency as f32,
                gain_db: entry.gain_db as f32,
                q: entry.q as f32,
            });
        }

        let c = &self.conditioner;
        let o = &self.oscillators;
        // Names were checked by validate().
        let waveforms = o.waveforms.each_ref().map(|name| Waveform::from_name(name).unwrap_or_default());

        Ok(TrackerSettings {
            sample_rate: self.audio.sample_rate as f32,
            block_size: self.audio.block_size,
            threshold_db: self.detector.threshold_db as f32,
            cascade,
            conditioner: ConditionerConfig {
                attack: c.attack as f32,
                release: c.release as f32,
                gate_onset_db: c.gate_onset_db as f32,
                gate_release_db: c.gate_release_db as f32,
                compressor_threshold_db: c.compressor_threshold_db as f32,
                compressor_ratio: c.compressor_ratio as f32,
                makeup_gain_db: c.makeup_gain_db as f32,
            },
            conditioning_enabled: c.enabled,
            envelope_hold_periods: self.detector.envelope_hold_periods as f32,
            envelope_gating: o.envelope_gating,
            switch_policy: match self.selection.switch_policy {
                SwitchPolicyName::Retain => SwitchPolicy::RetainHeldPitch,
                SwitchPolicyName::Reset => SwitchPolicy::ResetHeldPitch,
            },
            baseline_amplitude: o.baseline_amplitude as f32,
            cv: CvRange {
                f_min: self.cv.f_min as f32,
                f_max: self.cv.f_max as f32,
                full_scale: self.cv.full_scale,
            },
            secondary_cv: match self.cv.secondary {
                SecondaryOutput::EnvelopeA => SecondaryCv::EnvelopeA,
                SecondaryOutput::PitchB => SecondaryCv::PitchB,
            },
            initial_waveforms: waveforms,
            initial_base_index: self.selection.initial_base,
        })
    }

    /// The string catalog: the `strings` table, or the built-in guitar catalog.
    pub fn catalog(&self) -> Result<StringCatalog, ConfigError> {
        if self.strings.is_empty() {
            return Ok(StringCatalog::guitar());
        }
        let profiles = self
            .strings
            .iter()
            .map(|s| StringProfile::new(s.name.clone(), s.low_hz, s.high_hz))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StringCatalog::new(profiles)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_stock_module() {
        let config = TrackerConfig::from_toml("").unwrap();
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.settings().unwrap(), TrackerSettings::default());
        assert_eq!(config.catalog().unwrap(), StringCatalog::guitar());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = TrackerConfig::from_toml(
            r#"
[audio]
block_size = 96

[conditioner]
enabled = false
"#,
        )
        .unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(settings.block_size, 96);
        assert_eq!(settings.sample_rate, 48000.0);
        assert!(!settings.conditioning_enabled);
        assert_eq!(settings.conditioner, ConditionerConfig::default());
    }

    #[test]
    fn enums_use_kebab_case() {
        let config = TrackerConfig::from_toml(
            r#"
[cv]
secondary = "pitch-b"

[selection]
switch_policy = "reset"
initial_base = 3
"#,
        )
        .unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(settings.secondary_cv, SecondaryCv::PitchB);
        assert_eq!(settings.switch_policy, SwitchPolicy::ResetHeldPitch);
        assert_eq!(settings.initial_base_index, 3);
    }

    #[test]
    fn unknown_enum_value_is_a_parse_error() {
        let err = TrackerConfig::from_toml("[cv]\nsecondary = \"envelope-b\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn waveforms_by_name() {
        let config = TrackerConfig::from_toml("[oscillators]\nwaveforms = [\"sine\", \"square\"]\n").unwrap();
        assert_eq!(
            config.settings().unwrap().initial_waveforms,
            [Waveform::Sine, Waveform::Square]
        );
    }

    #[test]
    fn peaking_bands_reach_the_cascade() {
        let config = TrackerConfig::from_toml(
            r#"
[[cascade.peaking]]
frequency = 200.0
gain_db = 3.0
"#,
        )
        .unwrap();
        let cascade = config.settings().unwrap().cascade;
        assert_eq!(cascade.stage_count(), 5);
        let band = cascade.peaking[0].unwrap();
        assert_eq!(band.frequency, 200.0);
        assert_eq!(band.q, 1.0);
    }

    #[test]
    fn custom_strings_replace_the_catalog() {
        let config = TrackerConfig::from_toml(
            r#"
[[strings]]
name = "E"
low_hz = 41.2
high_hz = 174.6

[[strings]]
name = "A"
low_hz = 55.0
high_hz = 233.1
"#,
        )
        .unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.profile_at(0).unwrap().name(), "E");
        assert_eq!(config.string_count(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn single_string_catalog_is_rejected() {
        let config = TrackerConfig::from_toml("[[strings]]\nname = \"x\"\nlow_hz = 50.0\nhigh_hz = 100.0\n").unwrap();
        assert!(matches!(config.catalog(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn with_catalog_round_trips() {
        let original = TrackerConfig::default().with_catalog(&StringCatalog::guitar());
        let parsed = TrackerConfig::from_toml(&original.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.catalog().unwrap(), StringCatalog::guitar());
    }

    #[test]
    fn to_toml_is_readable() {
        let toml = TrackerConfig::default().to_toml().unwrap();
        assert!(toml.contains("[audio]"), "{toml}");
        assert!(toml.contains("sample_rate = 48000"), "{toml}");
        assert!(toml.contains("secondary = \"envelope-a\""), "{toml}");
        assert!(!toml.contains("[[strings]]"), "{toml}");
    }
}
