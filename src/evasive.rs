//! The evasive No button: it hops away whenever the pointer approaches and only
//! accepts a click after it has been chased `required_moves` times.

use rand::Rng;
use rand::distributions::Standard;

use crate::config::Config;
use crate::copy;
use crate::error::FlowError;

/// Container and widget sizes (CSS px) as measured at the time of approach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub container_width: f64,
    pub container_height: f64,
    pub widget_width: f64,
    pub widget_height: f64,
}

/// Where the widget should be drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Normal document flow (unmoved or settled).
    Natural,
    /// Absolute offset inside the container.
    At { x: f64, y: f64 },
}

/// Label tiers keyed on the number of moves still required.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelTier {
    Doubt,
    StillDoubt,
    Disbelief,
    Pleading,
    AlmostThere,
    Resigned,
}

impl LabelTier {
    pub fn for_remaining(remaining: i64) -> Self {
        match remaining {
            r if r > 30 => LabelTier::Doubt,
            r if r > 20 => LabelTier::StillDoubt,
            r if r > 10 => LabelTier::Disbelief,
            r if r > 5 => LabelTier::Pleading,
            r if r > 0 => LabelTier::AlmostThere,
            _ => LabelTier::Resigned,
        }
    }

    pub fn text(self, moves: u32, required: u32) -> String {
        let prefix = match self {
            LabelTier::Doubt => copy::BUTTON_TIERS[0],
            LabelTier::StillDoubt => copy::BUTTON_TIERS[1],
            LabelTier::Disbelief => copy::BUTTON_TIERS[2],
            LabelTier::Pleading => copy::BUTTON_TIERS[3],
            LabelTier::AlmostThere => copy::BUTTON_TIERS[4],
            LabelTier::Resigned => return copy::BUTTON_TERMINAL.to_string(),
        };
        format!("{prefix} ({moves}/{required})")
    }
}

/// Label shown after `moves` relocations.
pub fn label_for(moves: u32, required: u32) -> String {
    LabelTier::for_remaining(i64::from(required) - i64::from(moves)).text(moves, required)
}

/// Outcome of a successful approach.
#[derive(Clone, Debug, PartialEq)]
pub struct Relocation {
    pub move_count: u32,
    pub placement: Placement,
    pub label: String,
    /// This move earns a discouragement message.
    pub discourage: bool,
}

#[derive(Debug)]
pub struct EvasiveButton {
    required: u32,
    margin: f64,
    spread_divisor: f64,
    max_spread: f64,
    message_every: u32,
    move_count: u32,
    // Set while a relocation is settling; further approaches are dropped.
    animating: bool,
    placement: Placement,
    accepted: bool,
}

impl EvasiveButton {
    pub fn new(config: &Config) -> Self {
        Self {
            required: config.required_moves,
            margin: config.edge_margin_px.max(0.0),
            spread_divisor: config.spread_divisor.max(f64::EPSILON),
            max_spread: config.max_spread.max(0.0),
            message_every: config.message_every.max(1),
            move_count: 0,
            animating: false,
            placement: Placement::Natural,
            accepted: false,
        }
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn remaining(&self) -> i64 {
        i64::from(self.required) - i64::from(self.move_count)
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_unlocked(&self) -> bool {
        self.move_count >= self.required
    }

    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Current label text; the untouched button keeps its resting label.
    pub fn label(&self) -> String {
        if self.move_count == 0 {
            copy::BUTTON_INITIAL.to_string()
        } else {
            label_for(self.move_count, self.required)
        }
    }

    /// Spread multiplier for the current move count.
    pub fn spread(&self) -> f64 {
        (f64::from(self.move_count) / self.spread_divisor).min(self.max_spread)
    }

    /// Relocate in response to the pointer approaching. Returns `None` while a
    /// relocation is still settling. Once unlocked the count keeps climbing but
    /// the button stays in its natural spot.
    pub fn approach<R: Rng + ?Sized>(&mut self, bounds: &Bounds, rng: &mut R) -> Option<Relocation> {
        if self.animating {
            return None;
        }
        self.move_count += 1;
        self.animating = true;

        self.placement = if self.is_unlocked() {
            Placement::Natural
        } else {
            let max_x = (bounds.container_width - bounds.widget_width - self.margin).max(0.0);
            let max_y = (bounds.container_height - bounds.widget_height - self.margin).max(0.0);
            let spread = self.spread();
            let ux: f64 = rng.sample(Standard);
            let uy: f64 = rng.sample(Standard);
            Placement::At {
                x: (ux * max_x * spread).clamp(0.0, max_x),
                y: (uy * max_y * spread).clamp(0.0, max_y),
            }
        };

        let discourage = self.move_count % self.message_every == 0 && self.remaining() > 0;
        log::debug!("no button moved {}/{}", self.move_count, self.required);
        Some(Relocation {
            move_count: self.move_count,
            placement: self.placement,
            label: self.label(),
            discourage,
        })
    }

    /// End of the settle window; approaches are accepted again.
    pub fn settle(&mut self) {
        self.animating = false;
    }

    /// Try to click the button. Rejected until enough moves were made.
    pub fn confirm(&mut self) -> Result<(), FlowError> {
        if !self.is_unlocked() {
            return Err(FlowError::PrematureConfirmation {
                moves: self.move_count,
                required: self.required,
            });
        }
        self.accepted = true;
        self.placement = Placement::Natural;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.move_count = 0;
        self.animating = false;
        self.placement = Placement::Natural;
        self.accepted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha8Rng;

    const BOUNDS: Bounds = Bounds {
        container_width: 400.0,
        container_height: 300.0,
        widget_width: 80.0,
        widget_height: 40.0,
    };

    fn button() -> EvasiveButton {
        EvasiveButton::new(&Config::default())
    }

    fn chase(b: &mut EvasiveButton, rng: &mut ChaCha8Rng, times: u32) {
        for _ in 0..times {
            b.approach(&BOUNDS, rng);
            b.settle();
        }
    }

    #[test]
    fn label_tiers_follow_remaining_moves() {
        assert_eq!(label_for(0, 35), "No? 🤔 (0/35)");
        assert_eq!(label_for(4, 35), "No? 🤔 (4/35)");
        assert_eq!(label_for(5, 35), "Still No? 😅 (5/35)");
        assert_eq!(label_for(20, 35), "Really? 😢 (20/35)");
        assert_eq!(label_for(25, 35), "Come on... 🥺 (25/35)");
        assert_eq!(label_for(30, 35), "Almost there! 💔 (30/35)");
        assert_eq!(label_for(34, 35), "Almost there! 💔 (34/35)");
        assert_eq!(label_for(35, 35), copy::BUTTON_TERMINAL);
        assert_eq!(LabelTier::for_remaining(-3), LabelTier::Resigned);
    }

    #[test]
    fn untouched_button_shows_resting_label() {
        assert_eq!(button().label(), copy::BUTTON_INITIAL);
    }

    #[test]
    fn approach_while_settling_is_dropped() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert!(b.approach(&BOUNDS, &mut rng).is_some());
        assert!(b.approach(&BOUNDS, &mut rng).is_none());
        assert_eq!(b.move_count(), 1);
        b.settle();
        assert!(b.approach(&BOUNDS, &mut rng).is_some());
        assert_eq!(b.move_count(), 2);
    }

    #[test]
    fn relocation_stays_inside_container() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let max_x = BOUNDS.container_width - BOUNDS.widget_width - 40.0;
        let max_y = BOUNDS.container_height - BOUNDS.widget_height - 40.0;
        for _ in 0..34 {
            let r = b.approach(&BOUNDS, &mut rng).unwrap();
            let Placement::At { x, y } = r.placement else {
                panic!("expected absolute placement before unlock");
            };
            assert!((0.0..=max_x).contains(&x), "x={x}");
            assert!((0.0..=max_y).contains(&y), "y={y}");
            b.settle();
        }
    }

    #[test]
    fn tiny_container_pins_widget_at_origin() {
        let mut b = button();
        let tiny = Bounds {
            container_width: 50.0,
            container_height: 20.0,
            widget_width: 80.0,
            widget_height: 40.0,
        };
        let r = b.approach(&tiny, &mut StepRng::new(u64::MAX, 0)).unwrap();
        assert_eq!(r.placement, Placement::At { x: 0.0, y: 0.0 });
    }

    #[test]
    fn spread_grows_then_caps() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        chase(&mut b, &mut rng, 5);
        assert!((b.spread() - 0.5).abs() < 1e-9);
        chase(&mut b, &mut rng, 29);
        assert!((b.spread() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn every_fifth_move_discourages_until_unlocked() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let flagged: Vec<u32> = (0..35)
            .filter_map(|_| {
                let r = b.approach(&BOUNDS, &mut rng).unwrap();
                b.settle();
                r.discourage.then_some(r.move_count)
            })
            .collect();
        assert_eq!(flagged, vec![5, 10, 15, 20, 25, 30]);
    }

    #[test]
    fn confirm_gated_on_required_moves() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        chase(&mut b, &mut rng, 34);
        assert!(matches!(
            b.confirm(),
            Err(FlowError::PrematureConfirmation { moves: 34, required: 35 })
        ));
        chase(&mut b, &mut rng, 1);
        assert_eq!(b.placement(), Placement::Natural);
        assert!(b.confirm().is_ok());
        assert!(b.confirm().is_ok());
        assert!(b.is_accepted());
    }

    #[test]
    fn unlocked_button_keeps_counting_in_place() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        chase(&mut b, &mut rng, 35);
        for expected in 36..=40 {
            let r = b.approach(&BOUNDS, &mut rng).unwrap();
            assert_eq!(r.move_count, expected);
            assert_eq!(r.placement, Placement::Natural);
            assert_eq!(r.label, copy::BUTTON_TERMINAL);
            assert!(!r.discourage);
            assert!(b.is_animating());
            assert!(b.approach(&BOUNDS, &mut rng).is_none());
            b.settle();
        }
        assert_eq!(b.move_count(), 40);
        assert!(b.confirm().is_ok());
    }

    #[test]
    fn negative_tuning_never_leaves_container() {
        let config = Config::from_json(r#"{"max_spread": -1.0, "edge_margin_px": -500.0}"#).unwrap();
        let mut b = EvasiveButton::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let max_x = BOUNDS.container_width - BOUNDS.widget_width;
        let max_y = BOUNDS.container_height - BOUNDS.widget_height;
        for _ in 0..34 {
            let r = b.approach(&BOUNDS, &mut rng).unwrap();
            let Placement::At { x, y } = r.placement else {
                panic!("expected absolute placement before unlock");
            };
            assert!((0.0..=max_x).contains(&x), "x={x}");
            assert!((0.0..=max_y).contains(&y), "y={y}");
            b.settle();
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut b = button();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        chase(&mut b, &mut rng, 12);
        b.approach(&BOUNDS, &mut rng);
        b.reset();
        assert_eq!(b.move_count(), 0);
        assert!(!b.is_animating());
        assert_eq!(b.placement(), Placement::Natural);
        assert_eq!(b.label(), copy::BUTTON_INITIAL);
    }
}
