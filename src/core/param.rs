//! Filter parameters and the intensity mapping.
//!
//! Every filter is driven by one user-facing knob, the [`Intensity`]. Before
//! each render the knob is expanded into concrete values for the parameter
//! keys the active filter declares:
//!
//! | key         | value            |
//! |-------------|------------------|
//! | `intensity` | `i`              |
//! | `radius`    | `i * 200`        |
//! | `scale`     | `i * 10`         |
//!
//! Keys the filter does not declare stay unset and the filter falls back to
//! its own default.

use crate::core::filter::FilterKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Multiplier applied to the intensity for `radius` parameters.
pub const RADIUS_FACTOR: f32 = 200.0;

/// Multiplier applied to the intensity for `scale` parameters.
pub const SCALE_FACTOR: f32 = 10.0;

/// The fixed vocabulary of tunable parameter keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Intensity,
    Radius,
    Scale,
}

impl ParameterKey {
    /// All keys, in a stable order.
    pub const ALL: [ParameterKey; 3] = [
        ParameterKey::Intensity,
        ParameterKey::Radius,
        ParameterKey::Scale,
    ];

    /// Wire name of this key.
    pub fn name(&self) -> &'static str {
        match self {
            ParameterKey::Intensity => "intensity",
            ParameterKey::Radius => "radius",
            ParameterKey::Scale => "scale",
        }
    }

    /// Derive this key's value from the user intensity.
    pub fn value_for(&self, intensity: Intensity) -> f32 {
        let i = intensity.value();
        match self {
            ParameterKey::Intensity => i,
            ParameterKey::Radius => i * RADIUS_FACTOR,
            ParameterKey::Scale => i * SCALE_FACTOR,
        }
    }

    fn index(&self) -> usize {
        match self {
            ParameterKey::Intensity => 0,
            ParameterKey::Radius => 1,
            ParameterKey::Scale => 2,
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// User-facing intensity scalar.
///
/// The controls that produce it keep it inside [0, 1]; the pipeline itself
/// passes whatever it is given straight through the mapping.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intensity(f32);

impl Intensity {
    pub const MIN: Intensity = Intensity(0.0);
    pub const MAX: Intensity = Intensity(1.0);

    /// Wrap a raw value as-is.
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Wrap a value, clamping it into [0, 1]. NaN becomes 0.
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// The raw scalar.
    pub const fn value(&self) -> f32 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.5)
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Concrete parameter values for one render.
///
/// Only keys the filter declares are ever set by
/// [`FilterParameters::from_intensity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParameters {
    values: [Option<f32>; 3],
}

impl FilterParameters {
    /// An empty parameter set; every filter falls back to its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expand an intensity into the keys `kind` declares.
    pub fn from_intensity(kind: FilterKind, intensity: Intensity) -> Self {
        let mut params = Self::new();
        for key in kind.accepted_keys() {
            params.values[key.index()] = Some(key.value_for(intensity));
        }
        params
    }

    /// Get a value, if set.
    pub fn get(&self, key: ParameterKey) -> Option<f32> {
        self.values[key.index()]
    }

    /// Get a value, or the filter's default if unset.
    pub fn get_or(&self, key: ParameterKey, default: f32) -> f32 {
        self.get(key).unwrap_or(default)
    }

    /// Set a value explicitly.
    pub fn set(&mut self, key: ParameterKey, value: f32) {
        self.values[key.index()] = Some(value);
    }

    /// Builder-style [`FilterParameters::set`].
    pub fn with(mut self, key: ParameterKey, value: f32) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate over the keys that are set, in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, f32)> + '_ {
        ParameterKey::ALL
            .iter()
            .filter_map(move |key| self.get(*key).map(|v| (*key, v)))
    }

    /// Number of keys that are set.
    pub fn len(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Check if no key is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for FilterParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={:.3}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// UI hints for parameter display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "widget", content = "options")]
pub enum UiHint {
    /// Slider for numeric values
    Slider {
        /// Whether to use logarithmic scale
        logarithmic: bool,
    },
}

/// Documentation of one parameter a filter accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterDefinition {
    /// Which key of the vocabulary this is
    pub key: ParameterKey,
    /// Human-readable name
    pub display_name: String,
    /// Value used when the key is unset
    pub default_value: f32,
    /// Meaningful range of values (min, max)
    pub range: (f32, f32),
    /// Description for documentation
    pub description: String,
    /// UI widget hint
    pub ui_hint: UiHint,
}

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(key: ParameterKey, default_value: f32) -> Self {
        Self {
            display_name: key_to_display(key),
            key,
            default_value,
            range: (0.0, Self::natural_max(key)),
            description: String::new(),
            ui_hint: UiHint::Slider { logarithmic: false },
        }
    }

    /// The largest value the intensity mapping can produce for a key.
    pub fn natural_max(key: ParameterKey) -> f32 {
        key.value_for(Intensity::MAX)
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set UI hint to logarithmic slider.
    pub fn logarithmic(mut self) -> Self {
        self.ui_hint = UiHint::Slider { logarithmic: true };
        self
    }

    /// Check if a value lies within the documented range.
    pub fn in_range(&self, value: f32) -> bool {
        value >= self.range.0 && value <= self.range.1
    }
}

fn key_to_display(key: ParameterKey) -> String {
    let name = key.name();
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}
