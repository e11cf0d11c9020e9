use std::f64::consts::FRAC_PI_2;

/// Radians of rotation per dragged point.
const DRAG_SPEED: f64 = 0.01;

/// Orthographic camera orbiting the unit cube of the 3D scatter.
///
/// Coordinates are `[x, y, z]` with `z` pointing up. `yaw` spins around the
/// vertical axis, `pitch` tilts the cube towards the viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub yaw: f64,
    pub pitch: f64,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            yaw: -0.6,
            pitch: 0.35,
        }
    }
}

impl Orbit {
    /// Project a 3D point onto the screen plane.
    pub fn project(&self, [x, y, z]: [f64; 3]) -> [f64; 2] {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();

        let rx = x * cy - y * sy;
        let ry = x * sy + y * cy;
        let screen_y = ry * sp + z * cp;
        [rx, screen_y]
    }

    /// Depth of a point along the viewing direction (larger is closer).
    pub fn depth(&self, [x, y, z]: [f64; 3]) -> f64 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let ry = x * sy + y * cy;
        z * sp - ry * cp
    }

    /// Apply a mouse drag in screen points.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw += dx as f64 * DRAG_SPEED;
        self.pitch = (self.pitch + dy as f64 * DRAG_SPEED).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
}

/// The twelve edges of the cube `[-1, 1]^3`.
pub fn cube_edges() -> Vec<([f64; 3], [f64; 3])> {
    let corners: Vec<[f64; 3]> = (0..8)
        .map(|i| {
            let bit = |b: u32| if i & (1 << b) != 0 { 1.0 } else { -1.0 };
            [bit(0), bit(1), bit(2)]
        })
        .collect();

    let mut edges = Vec::with_capacity(12);
    for (i, a) in corners.iter().enumerate() {
        for b in &corners[i + 1..] {
            let differing = (0..3).filter(|&k| a[k] != b[k]).count();
            if differing == 1 {
                edges.push((*a, *b));
            }
        }
    }
    edges
}
