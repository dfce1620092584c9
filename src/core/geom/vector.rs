use serde::{Deserialize, Serialize};

/// 2D point/vector on the schematic grid.
///
/// Positions are nominally integer grid coordinates but the text format
/// permits floats, so we store f64 throughout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }

    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }

    pub fn mul(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    /// Fused multiply-add against another vector: self + o * s.
    pub fn mul_add(self, o: Vec2, s: f64) -> Vec2 {
        Vec2::new(self.x + o.x * s, self.y + o.y * s)
    }

    pub fn round(self) -> Vec2 {
        Vec2::new(self.x.round(), self.y.round())
    }

    pub fn dist_sq(self, o: Vec2) -> f64 {
        let dx = self.x - o.x;
        let dy = self.y - o.y;
        dx * dx + dy * dy
    }

    pub fn len(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// Axis-aligned bounding box. Starts empty; grows by adding points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec2,
    pub max: Vec2,
    pub empty: bool,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundingBox {
    pub fn new() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
            empty: true,
        }
    }

    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            empty: false,
        }
    }

    pub fn add_in_place(&mut self, p: Vec2) {
        if self.empty {
            self.min = p;
            self.max = p;
            self.empty = false;
        } else {
            self.min.x = self.min.x.min(p.x);
            self.min.y = self.min.y.min(p.y);
            self.max.x = self.max.x.max(p.x);
            self.max.y = self.max.y.max(p.y);
        }
    }

    pub fn union_in_place(&mut self, o: &BoundingBox) {
        if !o.empty {
            self.add_in_place(o.min);
            self.add_in_place(o.max);
        }
    }

    pub fn expand_in_place(&mut self, amt: f64) {
        if !self.empty {
            self.min.x -= amt;
            self.min.y -= amt;
            self.max.x += amt;
            self.max.y += amt;
        }
    }

    /// Shrink on both axes, used to pull a comp's hit box inside its port ring.
    pub fn shrink_in_place_xy(mut self, amt: f64) -> Self {
        if !self.empty {
            self.min.x += amt;
            self.min.y += amt;
            self.max.x -= amt;
            self.max.y -= amt;
        }
        self
    }

    pub fn size(&self) -> Vec2 {
        if self.empty {
            Vec2::ZERO
        } else {
            self.max.sub(self.min)
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        !self.empty && p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
