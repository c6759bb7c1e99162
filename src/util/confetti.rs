//! One-shot celebration effect fired after a successful balance reveal.
//!
//! The controller only calls [`Celebration::celebrate`]. The stock burst
//! parameters match the web dashboard: 120 particles, 80 degree spread, launched
//! from 60% down the viewport in gold, orange, and white.

#[cfg(test)]
#[path = "confetti_test.rs"]
mod confetti_test;

use rand::Rng;

pub const GOLD: &str = "#F5C518";
pub const ORANGE: &str = "#FF8C00";
pub const WHITE: &str = "#FFFFFF";

/// Visual effect hook.
pub trait Celebration: Send + Sync {
    fn celebrate(&self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiBurst {
    pub particle_count: usize,
    /// Full cone width in degrees, centred on straight up.
    pub spread_degrees: f64,
    /// Launch point as a fraction of viewport height from the top.
    pub origin_y: f64,
    pub colors: Vec<&'static str>,
}

impl Default for ConfettiBurst {
    fn default() -> Self {
        Self { particle_count: 120, spread_degrees: 80.0, origin_y: 0.6, colors: vec![GOLD, ORANGE, WHITE] }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Launch angle in degrees from vertical; negative is left.
    pub angle_degrees: f64,
    /// Relative launch speed in `0.5..1.0`.
    pub velocity: f64,
    pub color: &'static str,
}

impl ConfettiBurst {
    /// Sample one burst of particles.
    pub fn particles<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        let half = self.spread_degrees / 2.0;
        (0..self.particle_count)
            .map(|_| Particle {
                angle_degrees: if half > 0.0 { rng.random_range(-half..=half) } else { 0.0 },
                velocity: rng.random_range(0.5..1.0),
                color: self.pick_color(rng),
            })
            .collect()
    }

    fn pick_color<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        if self.colors.is_empty() {
            return WHITE;
        }
        self.colors[rng.random_range(0..self.colors.len())]
    }

    /// Render the burst as a strip of `width` terminal cells.
    ///
    /// Each particle lands in the column its angle points at; the cell shows the
    /// glyph of the last color to land there.
    #[must_use]
    pub fn render_strip<R: Rng + ?Sized>(&self, rng: &mut R, width: usize) -> String {
        if width == 0 {
            return String::new();
        }
        let mut cells = vec![' '; width];
        let half = (self.spread_degrees / 2.0).max(f64::EPSILON);
        #[allow(clippy::cast_precision_loss)]
        let last = (width - 1) as f64;
        for particle in self.particles(rng) {
            let frac = ((particle.angle_degrees + half) / (2.0 * half)).clamp(0.0, 1.0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let col = (frac * last).round() as usize;
            cells[col.min(width - 1)] = glyph(particle.color);
        }
        cells.into_iter().collect()
    }
}

fn glyph(color: &str) -> char {
    match color {
        GOLD => '*',
        ORANGE => '+',
        _ => '.',
    }
}
