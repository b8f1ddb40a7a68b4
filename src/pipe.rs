use rand::Rng;

use crate::bird::Bird;
use crate::config::PipeRules;
use crate::sprite::SpriteAtlas;

/// A paired top/bottom barrier. The gap-top height is sampled once at
/// construction and never changes; the gap size is a rule constant shared by
/// every pipe.
#[derive(Debug, Clone)]
pub struct Pipe {
    pub x: f64,
    gap_top: f64,
    passed: bool,
}

impl Pipe {
    pub fn spawn(rules: &PipeRules, rng: &mut impl Rng) -> Self {
        Self {
            x: rules.spawn_x,
            gap_top: rng.gen_range(rules.gap_top_min..rules.gap_top_max),
            passed: false,
        }
    }

    #[cfg(test)]
    pub fn with_gap_top(rules: &PipeRules, gap_top: f64) -> Self {
        Self {
            x: rules.spawn_x,
            gap_top,
            passed: false,
        }
    }

    /// y of the gap's upper edge (bottom edge of the top half).
    pub fn gap_top(&self) -> f64 {
        self.gap_top
    }

    /// y of the gap's lower edge (top edge of the bottom half).
    pub fn gap_bottom(&self, rules: &PipeRules) -> f64 {
        self.gap_top + rules.gap
    }

    /// Top-left y of the top sprite (extends above the window).
    pub fn top_sprite_y(&self, rules: &PipeRules) -> f64 {
        self.gap_top - rules.sprite_height as f64
    }

    pub fn right_edge(&self, rules: &PipeRules) -> f64 {
        self.x + rules.sprite_width as f64
    }

    pub fn off_screen(&self, rules: &PipeRules) -> bool {
        self.right_edge(rules) < 0.0
    }

    pub fn advance(&mut self, rules: &PipeRules) {
        self.x -= rules.velocity;
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn mark_passed(&mut self) {
        self.passed = true;
    }

    /// Mask test of the bird against both halves at their relative offsets.
    pub fn collides(&self, bird: &Bird, rules: &PipeRules, atlas: &SpriteAtlas) -> bool {
        let bird_mask = atlas.bird(bird.pose());
        let dx = self.x.round() as i64 - bird.x.round() as i64;
        let top_dy = self.top_sprite_y(rules).round() as i64 - bird.pixel_y();
        let bottom_dy = self.gap_bottom(rules).round() as i64 - bird.pixel_y();
        bird_mask.overlap(atlas.pipe_top(), (dx, top_dy))
            || bird_mask.overlap(atlas.pipe_bottom(), (dx, bottom_dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BirdRules;

    fn atlas(rules: &PipeRules) -> SpriteAtlas {
        let bird = BirdRules::default();
        SpriteAtlas::build(
            bird.sprite_width,
            bird.sprite_height,
            rules.sprite_width,
            rules.sprite_height,
        )
    }

    #[test]
    fn gap_size_is_constant() {
        let rules = PipeRules::default();
        for gap_top in [50.0, 123.4, 449.9] {
            let pipe = Pipe::with_gap_top(&rules, gap_top);
            assert_eq!(pipe.gap_bottom(&rules) - pipe.gap_top(), rules.gap);
        }
    }

    #[test]
    fn advances_left_and_leaves_screen() {
        let rules = PipeRules::default();
        let mut pipe = Pipe::with_gap_top(&rules, 200.0);
        for _ in 0..120 {
            pipe.advance(&rules);
        }
        assert_eq!(pipe.x, 600.0 - 5.0 * 120.0);
        assert!(!pipe.off_screen(&rules), "x=0 still shows the full sprite");
        // 104px of sprite must clear the left edge before removal.
        for _ in 0..21 {
            pipe.advance(&rules);
        }
        assert!(pipe.off_screen(&rules));
    }

    #[test]
    fn bird_in_gap_center_does_not_collide() {
        let rules = PipeRules::default();
        let atlas = atlas(&rules);
        let bird_rules = BirdRules::default();
        let mut bird = Bird::spawn(&bird_rules);
        let pipe = Pipe::with_gap_top(&rules, 300.0);
        // Center the bird in the gap, horizontally over the pipe.
        bird.y = 300.0 + rules.gap / 2.0 - bird_rules.sprite_height as f64 / 2.0;
        let mut pipe = pipe;
        pipe.x = bird.x;
        assert!(!pipe.collides(&bird, &rules, &atlas));
    }

    #[test]
    fn bird_inside_either_half_collides() {
        let rules = PipeRules::default();
        let atlas = atlas(&rules);
        let bird_rules = BirdRules::default();
        let mut bird = Bird::spawn(&bird_rules);
        let mut pipe = Pipe::with_gap_top(&rules, 300.0);
        pipe.x = bird.x;

        bird.y = 200.0; // well inside the top half
        assert!(pipe.collides(&bird, &rules, &atlas));

        bird.y = 600.0; // well inside the bottom half
        assert!(pipe.collides(&bird, &rules, &atlas));
    }

    #[test]
    fn distant_pipe_never_collides() {
        let rules = PipeRules::default();
        let atlas = atlas(&rules);
        let bird = Bird::spawn(&BirdRules::default());
        let pipe = Pipe::with_gap_top(&rules, 300.0);
        assert!(
            !pipe.collides(&bird, &rules, &atlas),
            "pipe at spawn x is far right of the bird"
        );
    }
}
