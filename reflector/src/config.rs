use crate::{BeamStyle, Float, ReflectionMode};

/// What a reflecting mirror does when the beam it refers to has disappeared
/// from the registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StaleBeamPolicy {
    /// Leave everything untouched. The mirror keeps referring to the missing
    /// beam until an external controller resets it.
    #[default]
    Ignore,
    /// Fall back to the idle behavior and emit a fresh beam.
    Recreate,
}

/// Per-mirror tuning knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReflectorConfig {
    pub reflection_mode: ReflectionMode,
    pub stale_beam_policy: StaleBeamPolicy,
    /// Added to half of the mirror's largest dimension to get its touch radius
    pub touch_margin: Float,
    /// Applied to every beam the mirror generates
    pub beam_style: BeamStyle,
}

impl ReflectorConfig {
    pub const DEFAULT_TOUCH_MARGIN: Float = 30.;

    #[inline]
    #[must_use]
    pub fn with_reflection_mode(mut self, reflection_mode: ReflectionMode) -> Self {
        self.reflection_mode = reflection_mode;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_stale_beam_policy(mut self, stale_beam_policy: StaleBeamPolicy) -> Self {
        self.stale_beam_policy = stale_beam_policy;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_touch_margin(mut self, touch_margin: Float) -> Self {
        self.touch_margin = touch_margin;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_beam_style(mut self, beam_style: BeamStyle) -> Self {
        self.beam_style = beam_style;
        self
    }
}

impl Default for ReflectorConfig {
    #[inline]
    fn default() -> Self {
        Self {
            reflection_mode: ReflectionMode::default(),
            stale_beam_policy: StaleBeamPolicy::default(),
            touch_margin: Self::DEFAULT_TOUCH_MARGIN,
            beam_style: BeamStyle::default(),
        }
    }
}
