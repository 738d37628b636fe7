use crate::domain::model::rounded_percent;
use std::time::Duration;

/// Total time the percentage counter takes to reach its target.
pub const COUNTER_DURATION: Duration = Duration::from_millis(1500);
/// Number of counter updates, independent of the target value.
pub const COUNTER_FRAMES: u32 = 60;
/// Pause between rendering the result panel and starting the gauge.
pub const START_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeColor {
    Green,
    Yellow,
    Red,
}

impl GaugeColor {
    pub fn for_percent(percent: f64) -> Self {
        if percent < 30.0 {
            GaugeColor::Green
        } else if percent < 60.0 {
            GaugeColor::Yellow
        } else {
            GaugeColor::Red
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            GaugeColor::Green => "#10b981",
            GaugeColor::Yellow => "#facc15",
            GaugeColor::Red => "#ef4444",
        }
    }
}

/// 圓形儀表的動畫參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeAnimation {
    probability: f64,
    target: u32,
}

impl GaugeAnimation {
    pub fn new(probability: f64) -> Self {
        let probability = probability.clamp(0.0, 100.0);
        Self {
            probability,
            target: rounded_percent(probability),
        }
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn frame_interval(&self) -> Duration {
        COUNTER_DURATION / COUNTER_FRAMES
    }

    /// Counter values, one per frame; the last one is always the target.
    pub fn frames(&self) -> impl Iterator<Item = u32> {
        let target = self.target;
        (1..=COUNTER_FRAMES).map(move |i| (target * i + COUNTER_FRAMES / 2) / COUNTER_FRAMES)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.probability / 100.0 * 360.0
    }

    pub fn color(&self) -> GaugeColor {
        GaugeColor::for_percent(self.probability)
    }
}
