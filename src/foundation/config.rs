use crate::{
    foundation::error::{PrintZoneError, PrintZoneResult},
    preview::capabilities::PlatformCapabilities,
};

/// UI chrome the engine is embedded in.
///
/// The engine logic is identical for every mode; only interaction tolerances differ.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Pointer-driven desktop editor.
    #[default]
    Desktop,
    /// Touch-driven mobile editor.
    Mobile,
    /// Compact embedded editor.
    Legacy,
}

impl PresentationMode {
    /// Extra hit-test slop in viewport pixels.
    pub fn hit_slop_px(self) -> f64 {
        match self {
            Self::Desktop => 4.0,
            Self::Mobile => 16.0,
            Self::Legacy => 6.0,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Visual margin factor applied when fitting the artwork into the container.
    pub padding_factor: f64,
    /// Integer resolution multiplier for exported rasters.
    pub export_multiplier: u32,
    /// Presentation flavour of the embedding UI.
    pub presentation: PresentationMode,
    /// Platform capability flags (filter reliability).
    pub capabilities: PlatformCapabilities,
    /// Draw the dashed print-zone outline in the preview mockup.
    pub show_zone_outline: bool,
    /// Maximum warp offset, in artwork units, produced by a full-contrast displacement map.
    pub displacement_scale: f64,
    /// Content used for freshly added text layers.
    pub default_text: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            padding_factor: 0.9,
            export_multiplier: 1,
            presentation: PresentationMode::Desktop,
            capabilities: PlatformCapabilities::default(),
            show_zone_outline: false,
            displacement_scale: 12.0,
            default_text: "Your text".to_string(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `PRINTZONE_*` environment variables.
    ///
    /// - `PRINTZONE_EXPORT_MULTIPLIER`: integer multiplier
    /// - `PRINTZONE_PADDING`: padding factor
    /// - `PRINTZONE_DISABLE_WARP`: any of `1`, `true`, `yes` disables displacement warp
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(m) = std::env::var("PRINTZONE_EXPORT_MULTIPLIER")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| (1..=MAX_EXPORT_MULTIPLIER).contains(&n))
        {
            cfg.export_multiplier = m;
        }
        if let Some(p) = std::env::var("PRINTZONE_PADDING")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p > 0.0 && *p <= 1.0)
        {
            cfg.padding_factor = p;
        }
        if std::env::var("PRINTZONE_DISABLE_WARP")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false)
        {
            cfg.capabilities.reliable_filters = false;
        }
        cfg
    }

    /// Validate ranges.
    pub fn validate(&self) -> PrintZoneResult<()> {
        if !(1..=MAX_EXPORT_MULTIPLIER).contains(&self.export_multiplier) {
            return Err(PrintZoneError::validation(format!(
                "export_multiplier must be in 1..={MAX_EXPORT_MULTIPLIER}"
            )));
        }
        if !self.padding_factor.is_finite()
            || self.padding_factor <= 0.0
            || self.padding_factor > 1.0
        {
            return Err(PrintZoneError::validation(
                "padding_factor must be in (0, 1]",
            ));
        }
        if !self.displacement_scale.is_finite() || self.displacement_scale < 0.0 {
            return Err(PrintZoneError::validation(
                "displacement_scale must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Validate ranges, plus the native export size for a `canvas_size` square canvas.
    pub fn validate_for_canvas(&self, canvas_size: u32) -> PrintZoneResult<()> {
        self.validate()?;
        let native = u64::from(canvas_size) * u64::from(self.export_multiplier);
        if native > u64::from(u16::MAX) {
            return Err(PrintZoneError::validation(format!(
                "canvas_size {canvas_size} x export_multiplier {} exceeds the {} px render limit",
                self.export_multiplier,
                u16::MAX
            )));
        }
        Ok(())
    }
}

/// Largest accepted export multiplier.
pub const MAX_EXPORT_MULTIPLIER: u32 = 4;

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
