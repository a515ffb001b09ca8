use serde::{Deserialize, Serialize};

/// Low-level pixel statistics of one photograph.
///
/// Produced once per classification call and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub avg_r: f64,
    pub avg_g: f64,
    pub avg_b: f64,
    /// Mean of the luminance grid.
    pub brightness: f64,
    /// Population standard deviation of the luminance grid.
    pub contrast: f64,
    /// Height divided by width.
    pub aspect_ratio: f64,
    pub edge_density: f64,
    /// Population variance of the luminance grid.
    pub texture_variance: f64,
    pub r_dominance: f64,
    pub g_dominance: f64,
    pub b_dominance: f64,
}

/// Names a single field of a [`FeatureVector`] so rules can refer to it as
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    AvgR,
    AvgG,
    AvgB,
    Brightness,
    Contrast,
    AspectRatio,
    EdgeDensity,
    TextureVariance,
    RDominance,
    GDominance,
    BDominance,
}

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::AvgR => self.avg_r,
            Feature::AvgG => self.avg_g,
            Feature::AvgB => self.avg_b,
            Feature::Brightness => self.brightness,
            Feature::Contrast => self.contrast,
            Feature::AspectRatio => self.aspect_ratio,
            Feature::EdgeDensity => self.edge_density,
            Feature::TextureVariance => self.texture_variance,
            Feature::RDominance => self.r_dominance,
            Feature::GDominance => self.g_dominance,
            Feature::BDominance => self.b_dominance,
        }
    }
}
