//! Comfort assessment for temperature/humidity readings
//!
//! Two independent threshold ladders live here: [`ComfortLevel`], used for the
//! console log, and [`DisplayStatus`], the short word shown on the OLED. Their
//! boundaries differ and are kept that way.

/// Comfort zone of a (temperature, humidity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortLevel {
    Comfortable,
    TooCold,
    Cold,
    TooHot,
    Hot,
    TooDry,
    Dry,
    TooHumid,
    Humid,
    /// Nothing above matched
    Moderate,
}

struct ComfortRule {
    matches: fn(f32, f32) -> bool,
    level: ComfortLevel,
}

/// Evaluated top to bottom, first match wins. The ranges overlap, so the
/// order decides precedence.
const COMFORT_LADDER: [ComfortRule; 9] = [
    ComfortRule {
        matches: |t, h| (20.0..=26.0).contains(&t) && (40.0..=60.0).contains(&h),
        level: ComfortLevel::Comfortable,
    },
    ComfortRule {
        matches: |t, _| t < 15.0,
        level: ComfortLevel::TooCold,
    },
    ComfortRule {
        matches: |t, _| t < 20.0,
        level: ComfortLevel::Cold,
    },
    ComfortRule {
        matches: |t, _| t > 30.0,
        level: ComfortLevel::TooHot,
    },
    ComfortRule {
        matches: |t, _| t > 26.0,
        level: ComfortLevel::Hot,
    },
    ComfortRule {
        matches: |_, h| h < 30.0,
        level: ComfortLevel::TooDry,
    },
    ComfortRule {
        matches: |_, h| h < 40.0,
        level: ComfortLevel::Dry,
    },
    ComfortRule {
        matches: |_, h| h > 70.0,
        level: ComfortLevel::TooHumid,
    },
    ComfortRule {
        matches: |_, h| h > 60.0,
        level: ComfortLevel::Humid,
    },
];

impl ComfortLevel {
    /// Classify a reading (°C, %RH).
    pub fn assess(temperature: f32, humidity: f32) -> Self {
        COMFORT_LADDER
            .iter()
            .find(|rule| (rule.matches)(temperature, humidity))
            .map_or(Self::Moderate, |rule| rule.level)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Comfortable => "comfortable",
            Self::TooCold => "too-cold",
            Self::Cold => "cold",
            Self::TooHot => "too-hot",
            Self::Hot => "hot",
            Self::TooDry => "too-dry",
            Self::Dry => "dry",
            Self::TooHumid => "too-humid",
            Self::Humid => "humid",
            Self::Moderate => "moderate",
        }
    }
}

impl core::fmt::Display for ComfortLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Status word on the bottom line of the sensor screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStatus {
    Cold,
    Hot,
    Dry,
    Humid,
    Ideal,
}

impl DisplayStatus {
    /// Expects the display-compensated temperature.
    pub fn assess(temperature: f32, humidity: f32) -> Self {
        if temperature < 18.0 {
            Self::Cold
        } else if temperature > 28.0 {
            Self::Hot
        } else if humidity < 40.0 {
            Self::Dry
        } else if humidity > 70.0 {
            Self::Humid
        } else {
            Self::Ideal
        }
    }

    /// Upper case, the OLED font has no lower case glyphs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cold => "COLD",
            Self::Hot => "HOT",
            Self::Dry => "DRY",
            Self::Humid => "HUMID",
            Self::Ideal => "IDEAL",
        }
    }
}
