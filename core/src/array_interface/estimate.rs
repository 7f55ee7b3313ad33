use serde::{Deserialize, Serialize};

/// Grid-peak record handed to downstream detection or plotting stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FkEstimate {
    pub method: String,
    pub ix: usize,
    pub iy: usize,
    pub relpow: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abspow: Option<f64>,
    pub slowness_x: f64,
    pub slowness_y: f64,
    pub slowness: f64,
    pub backazimuth_deg: f64,
}

impl FkEstimate {
    pub fn new(method: &str, ix: usize, iy: usize, relpow: f64, abspow: Option<f64>) -> Self {
        Self {
            method: method.to_string(),
            ix,
            iy,
            relpow,
            abspow,
            slowness_x: 0.0,
            slowness_y: 0.0,
            slowness: 0.0,
            backazimuth_deg: 0.0,
        }
    }

    /// Attaches the peak slowness; back azimuth is its azimuth plus 180 degrees.
    pub fn with_slowness(mut self, slowness_x: f64, slowness_y: f64) -> Self {
        self.slowness_x = slowness_x;
        self.slowness_y = slowness_y;
        self.slowness = slowness_x.hypot(slowness_y);
        self.backazimuth_deg = (slowness_x.atan2(slowness_y).to_degrees() + 180.0).rem_euclid(360.0);
        self
    }

    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self).map(|mut line| {
            line.push('\n');
            line
        })
    }
}
