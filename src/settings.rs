//! Presentation preferences
//!
//! Nothing here reaches the simulation. Settings live for the session only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === HUD ===
    /// Control hint banner at the start of an attempt
    pub show_instructions: bool,
    /// Level 2 progress bar
    pub show_progress: bool,

    // === Accessibility ===
    /// Reduced motion (no rain streaks, no blinking door)
    pub reduced_motion: bool,
    /// High contrast mode
    pub high_contrast: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            show_instructions: true,
            show_progress: true,

            reduced_motion: false,
            high_contrast: false,
        }
    }
}

impl Settings {
    /// Volume actually applied to sound effects
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Rain streaks are drawn (respects reduced_motion)
    pub fn rain_visible(&self) -> bool {
        !self.reduced_motion
    }

    /// Train door blink is drawn (respects reduced_motion)
    pub fn door_blink_visible(&self) -> bool {
        !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);

        settings.sfx_volume = 0.5;
        assert!((settings.effective_volume() - 0.4).abs() < 1e-6);

        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);

        settings.muted = false;
        settings.master_volume = 4.0;
        settings.sfx_volume = 1.0;
        assert_eq!(settings.effective_volume(), 1.0);
    }

    #[test]
    fn test_reduced_motion_hides_effects() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.rain_visible());
        assert!(!settings.door_blink_visible());
        assert!(Settings::default().rain_visible());
    }

    #[test]
    fn test_partial_json() {
        let settings: Settings = serde_json::from_str(r#"{"muted": true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.master_volume, 0.8);
    }
}
