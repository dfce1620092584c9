use super::vector::{BoundingBox, Vec2};

/// 2D affine transform, stored column-major as (a b c d e f):
///
/// ```text
/// | a c e |
/// | b d f |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMat2 {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMat2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineMat2 {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translate(v: Vec2) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, v.x, v.y)
    }

    pub fn scale1(s: f64) -> Self {
        Self::new(s, 0.0, 0.0, s, 0.0, 0.0)
    }

    pub fn mul(self, rhs: AffineMat2) -> Self {
        Self::new(
            self.a * rhs.a + self.c * rhs.b,
            self.b * rhs.a + self.d * rhs.b,
            self.a * rhs.c + self.c * rhs.d,
            self.b * rhs.c + self.d * rhs.d,
            self.a * rhs.e + self.c * rhs.f + self.e,
            self.b * rhs.e + self.d * rhs.f + self.f,
        )
    }

    pub fn mul_vec(self, v: Vec2) -> Vec2 {
        Vec2::new(
            self.a * v.x + self.c * v.y + self.e,
            self.b * v.x + self.d * v.y + self.f,
        )
    }
}

/// Exact rotation matrix for r quarter-turns clockwise (r in 0..4).
pub fn rotate_affine_int(r: u8) -> AffineMat2 {
    match r {
        1 => AffineMat2::new(0.0, 1.0, -1.0, 0.0, 0.0, 0.0),
        2 => AffineMat2::new(-1.0, 0.0, 0.0, -1.0, 0.0, 0.0),
        3 => AffineMat2::new(0.0, -1.0, 1.0, 0.0, 0.0, 0.0),
        _ => AffineMat2::identity(),
    }
}

/// Rotate a comp-relative point by r quarter-turns.
pub fn rotate_pos(r: u8, pos: Vec2) -> Vec2 {
    match r {
        1 => Vec2::new(-pos.y, pos.x),
        2 => Vec2::new(-pos.x, -pos.y),
        3 => Vec2::new(pos.y, -pos.x),
        _ => pos,
    }
}

pub fn invert_rotation(r: u8) -> u8 {
    (4 - (r % 4)) % 4
}

/// Bounding box of a comp of the given (unrotated) size placed at pos with
/// rotation r. The comp origin stays fixed while the body swings around it.
pub fn rotate_bbox_int(r: u8, pos: Vec2, size: Vec2) -> BoundingBox {
    let (min, max) = match r {
        1 => (
            Vec2::new(pos.x - size.y, pos.y),
            Vec2::new(pos.x, pos.y + size.x),
        ),
        2 => (Vec2::new(pos.x - size.x, pos.y - size.y), pos),
        3 => (
            Vec2::new(pos.x, pos.y - size.x),
            Vec2::new(pos.x + size.y, pos.y),
        ),
        _ => (pos, Vec2::new(pos.x + size.x, pos.y + size.y)),
    };
    BoundingBox::from_min_max(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_pos_quarter_turns() {
        let p = Vec2::new(3.0, 1.0);
        assert_eq!(rotate_pos(0, p), p);
        assert_eq!(rotate_pos(1, p), Vec2::new(-1.0, 3.0));
        assert_eq!(rotate_pos(2, p), Vec2::new(-3.0, -1.0));
        assert_eq!(rotate_pos(3, p), Vec2::new(1.0, -3.0));
    }

    #[test]
    fn test_rotate_affine_matches_rotate_pos() {
        let p = Vec2::new(2.0, 5.0);
        for r in 0..4u8 {
            assert_eq!(rotate_affine_int(r).mul_vec(p), rotate_pos(r, p));
        }
    }

    #[test]
    fn test_invert_rotation() {
        assert_eq!(invert_rotation(0), 0);
        assert_eq!(invert_rotation(1), 3);
        assert_eq!(invert_rotation(2), 2);
        assert_eq!(invert_rotation(3), 1);
    }

    #[test]
    fn test_rotate_bbox() {
        let bb = rotate_bbox_int(1, Vec2::new(10.0, 10.0), Vec2::new(4.0, 2.0));
        assert_eq!(bb.min, Vec2::new(8.0, 10.0));
        assert_eq!(bb.max, Vec2::new(10.0, 14.0));
    }

    #[test]
    fn test_affine_compose_translate_scale() {
        let m = AffineMat2::translate(Vec2::new(1.0, 2.0)).mul(AffineMat2::scale1(2.0));
        assert_eq!(m.mul_vec(Vec2::new(3.0, 4.0)), Vec2::new(7.0, 10.0));
    }
}
