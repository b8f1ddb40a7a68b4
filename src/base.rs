use crate::config::BaseRules;

/// The scrolling ground: two tiling segments moving at pipe speed, each
/// wrapping to the right of the other once fully off-screen.
#[derive(Debug, Clone)]
pub struct Base {
    pub x1: f64,
    pub x2: f64,
}

impl Base {
    pub fn new(rules: &BaseRules) -> Self {
        Self {
            x1: 0.0,
            x2: rules.segment_width,
        }
    }

    pub fn advance(&mut self, rules: &BaseRules, velocity: f64) {
        self.x1 -= velocity;
        self.x2 -= velocity;

        if self.x1 + rules.segment_width < 0.0 {
            self.x1 = self.x2 + rules.segment_width;
        }
        if self.x2 + rules.segment_width < 0.0 {
            self.x2 = self.x1 + rules.segment_width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_tile_continuously() {
        let rules = BaseRules::default();
        let mut base = Base::new(&rules);
        for tick in 0..10_000 {
            base.advance(&rules, 5.0);
            let (left, right) = if base.x1 < base.x2 {
                (base.x1, base.x2)
            } else {
                (base.x2, base.x1)
            };
            assert_eq!(
                right - left,
                rules.segment_width,
                "segments must stay adjacent at tick {tick}"
            );
            // A 550-wide viewport is always fully covered.
            assert!(left <= 0.0, "gap opened at the left edge, tick {tick}");
            assert!(right + rules.segment_width >= 550.0);
        }
    }
}
