//! Celebration and ambient effect models. Pure simulation; drawing lives in
//! `web::effects`.

use rand::Rng;
use rand::distributions::Standard;

use crate::copy;

pub const CONFETTI_COUNT: usize = 150;
pub const CONFETTI_COLORS: [&str; 5] = ["#7cb342", "#ff85a8", "#ffcce0", "#a5d6a7", "#fff8e7"];

pub const HEART_LIFETIME_MS: u32 = 7000;
pub const AMBIENT_HEART_INTERVAL_MS: u32 = 2000;
/// Chance that an ambient tick actually spawns a heart.
pub const AMBIENT_HEART_CHANCE: f64 = 0.3;
pub const CELEBRATION_HEARTS: u32 = 20;
pub const CELEBRATION_HEART_SPACING_MS: u32 = 100;

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.sample(Standard)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConfettiPiece {
    pub x: f64,
    pub y: f64,
    /// Size; also sets stroke width and fall speed.
    pub r: f64,
    /// Phase for horizontal drift.
    pub d: f64,
    pub color: &'static str,
    pub tilt: f64,
    pub tilt_angle: f64,
    pub tilt_step: f64,
}

/// One burst of confetti falling through a viewport.
#[derive(Clone, Debug, Default)]
pub struct Confetti {
    pieces: Vec<ConfettiPiece>,
}

impl Confetti {
    /// Spawn a full burst in the band just above a `width` x `height` viewport.
    pub fn burst<R: Rng + ?Sized>(width: f64, height: f64, rng: &mut R) -> Self {
        let pieces = (0..CONFETTI_COUNT)
            .map(|_| ConfettiPiece {
                x: unit(rng) * width,
                y: unit(rng) * height - height,
                r: unit(rng) * 6.0 + 4.0,
                d: unit(rng) * CONFETTI_COUNT as f64,
                color: CONFETTI_COLORS[rng.gen_range(0..CONFETTI_COLORS.len())],
                tilt: (unit(rng) * 10.0).floor() - 10.0,
                tilt_angle: 0.0,
                tilt_step: unit(rng) * 0.07 + 0.05,
            })
            .collect();
        Self { pieces }
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn is_finished(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Advance one frame and drop pieces that fell below `height`.
    pub fn step(&mut self, height: f64) {
        for (index, piece) in self.pieces.iter_mut().enumerate() {
            piece.tilt_angle += piece.tilt_step;
            piece.y += (piece.d.cos() + 3.0 + piece.r / 2.0) / 2.0;
            piece.x += piece.d.sin();
            piece.tilt = (piece.tilt_angle - index as f64 / 3.0).sin() * 15.0;
        }
        self.pieces.retain(|piece| piece.y <= height);
    }
}

/// Parameters for one floating heart element.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatingHeart {
    pub glyph: &'static str,
    /// Horizontal offset, percent of container width.
    pub left_pct: f64,
    pub duration_s: f64,
    pub font_px: f64,
}

impl FloatingHeart {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let glyph = if rng.gen_bool(0.5) {
            copy::HEART_GLYPHS[0]
        } else {
            copy::HEART_GLYPHS[1]
        };
        Self {
            glyph,
            left_pct: unit(rng) * 100.0,
            duration_s: unit(rng) * 3.0 + 4.0,
            font_px: unit(rng) * 10.0 + 15.0,
        }
    }
}

/// `"{d}d {h}h {m}m {s}s"` for the time left, or the arrival text once it is up.
pub fn format_countdown(remaining_ms: f64) -> String {
    if remaining_ms <= 0.0 || remaining_ms.is_nan() {
        return copy::COUNTDOWN_DONE.to_string();
    }
    let total_s = (remaining_ms / 1000.0).floor() as u64;
    let days = total_s / 86_400;
    let hours = (total_s % 86_400) / 3600;
    let minutes = (total_s % 3600) / 60;
    let seconds = total_s % 60;
    format!("{days}d {hours}h {minutes}m {seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn burst_spawns_above_viewport() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let confetti = Confetti::burst(800.0, 600.0, &mut rng);
        assert_eq!(confetti.pieces().len(), CONFETTI_COUNT);
        for p in confetti.pieces() {
            assert!((0.0..800.0).contains(&p.x));
            assert!((-600.0..0.0).contains(&p.y));
            assert!((4.0..10.0).contains(&p.r));
            assert!((-10.0..0.0).contains(&p.tilt));
            assert!(CONFETTI_COLORS.contains(&p.color));
        }
    }

    #[test]
    fn confetti_falls_out_and_finishes() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut confetti = Confetti::burst(320.0, 240.0, &mut rng);
        let mut frames = 0;
        while !confetti.is_finished() {
            confetti.step(240.0);
            frames += 1;
            assert!(frames < 10_000, "confetti never settled");
        }
        // Slowest fall is (-1 + 3 + 2) / 2 = 2px per frame over at most 480px.
        assert!(frames <= 241);
    }

    #[test]
    fn heart_parameters_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..50 {
            let h = FloatingHeart::random(&mut rng);
            assert!(copy::HEART_GLYPHS.contains(&h.glyph));
            assert!((0.0..100.0).contains(&h.left_pct));
            assert!((4.0..7.0).contains(&h.duration_s));
            assert!((15.0..25.0).contains(&h.font_px));
        }
    }

    #[test]
    fn countdown_formats_units() {
        let ms = ((2 * 86_400 + 3 * 3600 + 4 * 60 + 5) * 1000) as f64 + 999.0;
        assert_eq!(format_countdown(ms), "2d 3h 4m 5s");
        assert_eq!(format_countdown(0.0), copy::COUNTDOWN_DONE);
        assert_eq!(format_countdown(-5.0), copy::COUNTDOWN_DONE);
    }
}
