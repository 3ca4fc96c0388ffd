use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct OuterGaps {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct InnerGaps {
    #[serde(default)]
    pub horizontal: f64,
    #[serde(default)]
    pub vertical: f64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct GapSettings {
    #[serde(default)]
    pub outer: OuterGaps,
    #[serde(default)]
    pub inner: InnerGaps,
}

/// Settings consumed by the tiling engines. Loading these from disk is the
/// concern of an outer configuration layer; this struct is the injection
/// point.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    #[serde(default)]
    pub gaps: GapSettings,
    /// Smallest share of the tiling axis a stacked window may be resized to.
    #[serde(default = "default_min_stack_ratio")]
    pub min_stack_ratio: f64,
}

fn default_min_stack_ratio() -> f64 { 0.05 }

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            gaps: GapSettings::default(),
            min_stack_ratio: default_min_stack_ratio(),
        }
    }
}

impl LayoutSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !(0.0..0.5).contains(&self.min_stack_ratio) {
            issues.push(format!(
                "min_stack_ratio must be in [0, 0.5), got {}",
                self.min_stack_ratio
            ));
        }
        let g = &self.gaps;
        for (name, v) in [
            ("outer.top", g.outer.top),
            ("outer.left", g.outer.left),
            ("outer.bottom", g.outer.bottom),
            ("outer.right", g.outer.right),
            ("inner.horizontal", g.inner.horizontal),
            ("inner.vertical", g.inner.vertical),
        ] {
            if v < 0.0 {
                issues.push(format!("gap {name} must not be negative, got {v}"));
            }
        }
        issues
    }
}
