use serde::{Deserialize, Serialize};

/// Resolved surface appearance of a face group or body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    /// Linear RGBA base color, each channel in `[0, 1]`.
    pub base_color: [f32; 4],
    pub double_sided: bool,
    pub name: Option<String>,
}

impl Appearance {
    pub const FALLBACK_NAME: &'static str = "default";

    /// The hard-coded appearance used when no override resolves:
    /// opaque red, double-sided, metallic-roughness shading.
    pub fn fallback() -> Self {
        Self {
            base_color: [1.0, 0.0, 0.0, 1.0],
            double_sided: true,
            name: Some(Self::FALLBACK_NAME.to_string()),
        }
    }

    /// Double-sided appearance with the given RGBA, channels clamped to `[0, 1]`.
    pub fn from_rgba(rgba: [f32; 4]) -> Self {
        Self {
            base_color: rgba.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) }),
            double_sided: true,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn alpha(&self) -> f32 {
        self.base_color[3]
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha() >= 1.0
    }
}

impl Default for Appearance {
    fn default() -> Self {
        Self::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_red_and_double_sided() {
        let a = Appearance::default();
        assert_eq!(a.base_color, [1.0, 0.0, 0.0, 1.0]);
        assert!(a.double_sided);
        assert!(a.is_opaque());
        assert_eq!(a.name.as_deref(), Some("default"));
    }

    #[test]
    fn rgba_is_clamped() {
        let a = Appearance::from_rgba([1.5, -0.2, f32::NAN, 0.5]);
        assert_eq!(a.base_color, [1.0, 0.0, 0.0, 0.5]);
        assert!(!a.is_opaque());
    }
}
