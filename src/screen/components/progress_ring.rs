//! Circular progress indicator with a percentage label

use egui::{vec2, Align2, FontId, Pos2, Sense, Shape, Stroke, Ui};
use std::f32::consts::{FRAC_PI_2, TAU};

use crate::screen::theme::ThemeColors;

const SEGMENTS: usize = 64;

/// Circular progress indicator
pub struct ProgressRing {
    progress: f32,
    radius: f32,
    thickness: f32,
}

impl ProgressRing {
    /// `progress` is clamped to [0, 1]
    pub fn new(progress: f32) -> Self {
        Self {
            progress: progress.clamp(0.0, 1.0),
            radius: 40.0,
            thickness: 6.0,
        }
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn show(&self, ui: &mut Ui) {
        let side = (self.radius + self.thickness) * 2.0;
        let (rect, _) = ui.allocate_exact_size(vec2(side, side), Sense::hover());
        let painter = ui.painter();
        let center = rect.center();

        painter.circle_stroke(center, self.radius, Stroke::new(self.thickness, ThemeColors::TRACK));

        if self.progress > 0.0 {
            let sweep = TAU * self.progress;
            let points: Vec<Pos2> = (0..=SEGMENTS)
                .map(|i| {
                    let angle = -FRAC_PI_2 + sweep * i as f32 / SEGMENTS as f32;
                    center + self.radius * vec2(angle.cos(), angle.sin())
                })
                .collect();
            painter.add(Shape::line(
                points,
                Stroke::new(self.thickness, ThemeColors::ACCENT_PRIMARY),
            ));
        }

        painter.text(
            center,
            Align2::CENTER_CENTER,
            format!("{:.0}%", self.progress * 100.0),
            FontId::proportional(self.radius * 0.45),
            ThemeColors::TEXT_PRIMARY,
        );
    }
}
