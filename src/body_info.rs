//! Descriptive metadata kept next to each body: classification, label and trajectory plot
//! settings.

use std::fmt;
use std::str::FromStr;

use crate::constants::{Second, DEFAULT_TRAJECTORY_PLOT_SAMPLES, TRAJECTORY_PLOT_SAMPLES_RANGE};
use crate::values::Spectrum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classification {
    Planet,
    DwarfPlanet,
    Satellite,
    Asteroid,
    Comet,
    Spacecraft,
    Star,
    ReferencePoint,
    #[default]
    Other,
}

impl Classification {
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Planet => "planet",
            Classification::DwarfPlanet => "dwarf planet",
            Classification::Satellite => "satellite",
            Classification::Asteroid => "asteroid",
            Classification::Comet => "comet",
            Classification::Spacecraft => "spacecraft",
            Classification::Star => "star",
            Classification::ReferencePoint => "reference point",
            Classification::Other => "other",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Classification {
    type Err = ();

    /// Case-insensitive. `moon` and `minormoon` are accepted for satellites.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "planet" => Ok(Classification::Planet),
            "dwarfplanet" => Ok(Classification::DwarfPlanet),
            "satellite" | "moon" | "minormoon" => Ok(Classification::Satellite),
            "asteroid" => Ok(Classification::Asteroid),
            "comet" => Ok(Classification::Comet),
            "spacecraft" => Ok(Classification::Spacecraft),
            "star" => Ok(Classification::Star),
            "referencepoint" => Ok(Classification::ReferencePoint),
            "other" => Ok(Classification::Other),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub classification: Classification,
    pub description: String,
    pub label_color: Spectrum,
    /// Apparent size below which the label fades out; zero disables fading
    pub label_fade_size: f64,
    pub trajectory_plot_color: Spectrum,
    /// Plotted span of the trajectory; `None` lets the consumer pick one
    pub trajectory_plot_duration: Option<Second>,
    pub trajectory_plot_lead: Second,
    pub trajectory_plot_fade: f64,
    pub trajectory_plot_samples: u32,
}

impl Default for BodyInfo {
    fn default() -> Self {
        BodyInfo {
            classification: Classification::Other,
            description: String::new(),
            label_color: Spectrum::white(),
            label_fade_size: 0.0,
            trajectory_plot_color: Spectrum::white(),
            trajectory_plot_duration: None,
            trajectory_plot_lead: 0.0,
            trajectory_plot_fade: 0.0,
            trajectory_plot_samples: DEFAULT_TRAJECTORY_PLOT_SAMPLES,
        }
    }
}

impl BodyInfo {
    /// Sample counts outside 100–50000 are clamped; negative counts give the minimum.
    pub fn set_trajectory_plot_samples(&mut self, samples: i64) {
        let (min, max) = TRAJECTORY_PLOT_SAMPLES_RANGE;
        self.trajectory_plot_samples = samples.clamp(min as i64, max as i64) as u32;
    }

    /// Fade fraction, clamped to [0, 1].
    pub fn set_trajectory_plot_fade(&mut self, fade: f64) {
        self.trajectory_plot_fade = fade.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod body_info_test {
    use super::*;

    #[test]
    fn test_classification_names() {
        assert_eq!("Planet".parse(), Ok(Classification::Planet));
        assert_eq!("dwarf planet".parse(), Ok(Classification::DwarfPlanet));
        assert_eq!("moon".parse(), Ok(Classification::Satellite));
        assert_eq!("SPACECRAFT".parse(), Ok(Classification::Spacecraft));
        assert!("quasar".parse::<Classification>().is_err());
        assert_eq!(Classification::ReferencePoint.to_string(), "reference point");
    }

    #[test]
    fn test_plot_settings_are_clamped() {
        let mut info = BodyInfo::default();
        info.set_trajectory_plot_samples(3);
        assert_eq!(info.trajectory_plot_samples, 100);
        info.set_trajectory_plot_samples(1_000_000);
        assert_eq!(info.trajectory_plot_samples, 50_000);
        info.set_trajectory_plot_samples(-5);
        assert_eq!(info.trajectory_plot_samples, 100);

        info.set_trajectory_plot_fade(1.5);
        assert_eq!(info.trajectory_plot_fade, 1.0);
        info.set_trajectory_plot_fade(-0.2);
        assert_eq!(info.trajectory_plot_fade, 0.0);
    }
}
