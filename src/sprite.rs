//! Occupancy masks for pixel-accurate collision.
//!
//! Sprites are built procedurally (there is no asset pipeline): an elliptical
//! bird body with a per-pose wing, and pipes with a protruding cap on the
//! gap-facing end. Collision only needs occupancy, not color.

/// A binary occupancy grid with the sprite's top-left at (0, 0).
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set(&mut self, x: usize, y: usize, occupied: bool) {
        if x < self.width && y < self.height {
            self.bits[y * self.width + x] = occupied;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    pub fn occupied_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True if any occupied cell of `self` coincides with an occupied cell of
    /// `other` placed with its top-left at `offset` relative to `self`.
    pub fn overlap(&self, other: &Mask, offset: (i64, i64)) -> bool {
        let (ox, oy) = offset;
        let x_start = ox.max(0);
        let y_start = oy.max(0);
        let x_end = (ox + other.width as i64).min(self.width as i64);
        let y_end = (oy + other.height as i64).min(self.height as i64);
        if x_start >= x_end || y_start >= y_end {
            return false;
        }
        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x as usize, y as usize)
                    && other.get((x - ox) as usize, (y - oy) as usize)
                {
                    return true;
                }
            }
        }
        false
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, true);
            }
        }
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        for y in 0..self.height {
            for x in 0..self.width {
                let nx = (x as f64 + 0.5 - cx) / rx;
                let ny = (y as f64 + 0.5 - cy) / ry;
                if nx * nx + ny * ny <= 1.0 {
                    self.set(x, y, true);
                }
            }
        }
    }

    fn flip_vertical(&self) -> Mask {
        let mut flipped = Mask::empty(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                flipped.set(x, self.height - 1 - y, self.get(x, y));
            }
        }
        flipped
    }
}

pub const BIRD_POSE_COUNT: usize = 3;

/// Prebuilt masks for every bird pose and both pipe halves.
pub struct SpriteAtlas {
    bird: [Mask; BIRD_POSE_COUNT],
    pipe_top: Mask,
    pipe_bottom: Mask,
}

impl SpriteAtlas {
    pub fn build(bird_w: usize, bird_h: usize, pipe_w: usize, pipe_h: usize) -> Self {
        let bird = [
            bird_mask(bird_w, bird_h, WingPose::Up),
            bird_mask(bird_w, bird_h, WingPose::Mid),
            bird_mask(bird_w, bird_h, WingPose::Down),
        ];
        let pipe_bottom = pipe_mask(pipe_w, pipe_h);
        let pipe_top = pipe_bottom.flip_vertical();
        Self {
            bird,
            pipe_top,
            pipe_bottom,
        }
    }

    pub fn bird(&self, pose: usize) -> &Mask {
        &self.bird[pose % BIRD_POSE_COUNT]
    }

    pub fn pipe_top(&self) -> &Mask {
        &self.pipe_top
    }

    pub fn pipe_bottom(&self) -> &Mask {
        &self.pipe_bottom
    }

    pub fn bird_height(&self) -> usize {
        self.bird[0].height()
    }
}

enum WingPose {
    Up,
    Mid,
    Down,
}

fn bird_mask(w: usize, h: usize, pose: WingPose) -> Mask {
    let mut mask = Mask::empty(w, h);
    let (wf, hf) = (w as f64, h as f64);
    mask.fill_ellipse(wf * 0.5, hf * 0.5, wf * 0.42, hf * 0.38);
    // Beak on the leading edge.
    mask.fill_rect(w * 4 / 5, h * 2 / 5, w - w * 4 / 5, h / 5);
    // Wing placement is the only difference between poses.
    let wing_w = w / 3;
    let wing_h = h / 4;
    let wing_x = w / 6;
    let wing_y = match pose {
        WingPose::Up => 0,
        WingPose::Mid => h * 3 / 8,
        WingPose::Down => h - wing_h,
    };
    mask.fill_rect(wing_x, wing_y, wing_w, wing_h);
    mask
}

/// Bottom-half pipe: body slightly inset, cap protruding at the gap-facing
/// (top) end with notched corners. The top half is this mask flipped.
fn pipe_mask(w: usize, h: usize) -> Mask {
    let mut mask = Mask::empty(w, h);
    let cap_h = (h / 16).max(4);
    let inset = (w / 16).max(2);
    mask.fill_rect(inset, cap_h, w - 2 * inset, h - cap_h);
    mask.fill_rect(0, 0, w, cap_h);
    mask.set(0, 0, false);
    mask.set(w - 1, 0, false);
    mask
}
