mod color;
mod draw;

use std::f64::consts::PI;

use crate::state::FrameSnapshot;
use crate::vec2::Vec2;

use draw::{screen_blend, Canvas};

/// Particle dot radius in pixels.
pub const PARTICLE_RADIUS: f64 = 3.0;
/// Vortex marker circumradius in pixels.
pub const VORTEX_MARKER_PX: f64 = 16.0;
/// Vortex marker spin per tick, per unit of circulation and time step.
const VORTEX_SPIN: f64 = 40.0;
const DIPOLE_SCALE_PX: f64 = 2000.0;

/// Pixel layout of the window. The domain fills it, y pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Arrow shaft length in pixels.
    pub arrow_len: f64,
}

impl RenderConfig {
    /// A `width × height` window with arrows sized to the quiver grid spacing.
    pub fn fit((width, height): (usize, usize), arrow_cols: usize, arrow_rows: usize) -> Self {
        let spacing = (width as f64 / arrow_cols.max(1) as f64).min(height as f64 / arrow_rows.max(1) as f64);
        Self {
            width,
            height,
            arrow_len: spacing * 0.6,
        }
    }

    pub fn buffer_len(&self) -> usize {
        self.width * self.height * 4
    }

    /// Domain point to pixel coordinates (origin top-left).
    pub fn to_screen(&self, p: Vec2) -> (f64, f64) {
        (p.x * self.width as f64, (1.0 - p.y) * self.height as f64)
    }
}

/// Triangle corners at 90°, 210° and 330°, spun by `angle` (y up).
fn vortex_triangle(center: (f64, f64), angle: f64) -> [(f64, f64); 3] {
    let corner = |a: f64| {
        let t = a + angle;
        (center.0 + VORTEX_MARKER_PX * t.cos(), center.1 - VORTEX_MARKER_PX * t.sin())
    };
    [corner(PI / 2.0), corner(7.0 / 6.0 * PI), corner(-PI / 6.0)]
}

/// Spin of a vortex marker after `tick` ticks.
pub fn vortex_angle(strength: f64, dt: f64, tick: u64) -> f64 {
    strength * dt * VORTEX_SPIN * tick as f64
}

fn draw_arrows(canvas: &mut Canvas, snap: &FrameSnapshot, cfg: &RenderConfig) {
    for (s, &level) in snap.arrows.iter().zip(&snap.arrow_levels) {
        if level == 0 || s.dir == Vec2::zero() {
            continue;
        }
        let (bx, by) = cfg.to_screen(s.pos);
        let dx = s.dir.x * cfg.arrow_len;
        // Y is flipped for screen coords
        let dy = -s.dir.y * cfg.arrow_len;
        let color = color::grey(level);

        let (x0, y0) = (bx as isize, by as isize);
        let (x1, y1) = ((bx + dx) as isize, (by + dy) as isize);
        canvas.draw_line_blended(x0, y0, x1, y1, color, 1.0, screen_blend);

        // Arrowhead: two lines from the tip at ±150° from the shaft
        let head_len = 3.0_f64.min(cfg.arrow_len * 0.35);
        let (dir_x, dir_y) = (s.dir.x, -s.dir.y);
        let cos_a = -0.866_f64;
        let sin_a = 0.5_f64;
        for &sign in &[1.0_f64, -1.0] {
            let hx = (dir_x * cos_a - dir_y * sin_a * sign) * head_len;
            let hy = (dir_x * sin_a * sign + dir_y * cos_a) * head_len;
            let hx1 = (x1 as f64 + hx) as isize;
            let hy1 = (y1 as f64 + hy) as isize;
            canvas.draw_line_blended(x1, y1, hx1, hy1, color, 1.0, screen_blend);
        }
    }
}

fn draw_markers(canvas: &mut Canvas, snap: &FrameSnapshot, cfg: &RenderConfig) {
    for d in &snap.dipoles {
        let (x, y) = cfg.to_screen(d.pos);
        canvas.fill_disc(x, y, d.strength.abs() * DIPOLE_SCALE_PX, color::by_sign(d.strength));
    }
    for s in &snap.sources {
        let (x, y) = cfg.to_screen(s.pos);
        canvas.fill_square(x, y, 2.0 * s.strength.abs() + 1.0, color::by_sign(s.strength));
    }
    for v in &snap.vortices {
        let center = cfg.to_screen(v.pos);
        let angle = vortex_angle(v.strength, snap.dt, snap.tick);
        canvas.fill_triangle(vortex_triangle(center, angle), color::NEGATIVE);
    }
}

/// Render arrows, particles and element markers into an RGBA buffer.
/// The buffer is resized and cleared to black.
pub fn render_into(buf: &mut Vec<u8>, snap: &FrameSnapshot, cfg: &RenderConfig) {
    buf.resize(cfg.buffer_len(), 0);
    buf.fill(0);
    let mut canvas = Canvas::new(buf, cfg.width, cfg.height);

    draw_arrows(&mut canvas, snap, cfg);

    // sentinels land far off-frame and are clipped
    for &p in &snap.particles {
        let (x, y) = cfg.to_screen(p);
        canvas.fill_disc(x, y, PARTICLE_RADIUS, color::PARTICLE);
    }

    draw_markers(&mut canvas, snap, cfg);
}

#[cfg(test)]
pub fn render(snap: &FrameSnapshot, cfg: &RenderConfig) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, snap, cfg);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrows::ArrowSample;
    use crate::flow::{Element, FlowParams, SENTINEL};
    use crate::state::{default_scene, SimState};

    fn test_config() -> RenderConfig {
        RenderConfig::fit((600, 400), 15, 10)
    }

    fn pixel(buf: &[u8], cfg: &RenderConfig, x: usize, y: usize) -> [u8; 3] {
        let off = (y * cfg.width + x) * 4;
        [buf[off], buf[off + 1], buf[off + 2]]
    }

    fn empty_snap() -> FrameSnapshot {
        FrameSnapshot { dt: 0.002, ..FrameSnapshot::default() }
    }

    #[test]
    fn test_render_config_fit() {
        let cfg = test_config();
        assert_eq!(cfg.width, 600);
        assert_eq!(cfg.height, 400);
        assert!((cfg.arrow_len - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_screen_y_flip() {
        let cfg = test_config();
        assert_eq!(cfg.to_screen(Vec2::new(0.0, 0.0)), (0.0, 400.0));
        assert_eq!(cfg.to_screen(Vec2::new(1.0, 1.0)), (600.0, 0.0));
        assert_eq!(cfg.to_screen(Vec2::new(0.5, 0.25)), (300.0, 300.0));
    }

    #[test]
    fn test_render_buffer_size() {
        let snap = SimState::new(FlowParams::default(), &default_scene(), true, 15, 10).snapshot();
        let cfg = test_config();
        let buf = render(&snap, &cfg);
        assert_eq!(buf.len(), cfg.width * cfg.height * 4);
    }

    #[test]
    fn test_particle_drawn_at_position() {
        let mut snap = empty_snap();
        snap.particles.push(Vec2::new(0.25, 0.25));
        let cfg = test_config();
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 150, 300), color::PARTICLE);
        assert_eq!(pixel(&buf, &cfg, 150, 100), [0, 0, 0]);
    }

    #[test]
    fn test_sentinel_particles_are_clipped() {
        let mut snap = empty_snap();
        snap.particles = vec![SENTINEL; 50];
        let cfg = test_config();
        let buf = render(&snap, &cfg);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_dipole_marker_color_and_size() {
        let cfg = test_config();
        let mut snap = empty_snap();
        snap.dipoles.push(Element { pos: Vec2::new(0.5, 0.5), strength: 0.01 });
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 300, 200), color::POSITIVE);
        // radius |m|·2000 = 20 px
        assert_eq!(pixel(&buf, &cfg, 315, 200), color::POSITIVE);
        assert_eq!(pixel(&buf, &cfg, 325, 200), [0, 0, 0]);

        snap.dipoles[0].strength = -0.01;
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 300, 200), color::NEGATIVE);
    }

    #[test]
    fn test_sink_marker_is_negative_square() {
        let cfg = test_config();
        let mut snap = empty_snap();
        snap.sources.push(Element { pos: Vec2::new(0.5, 0.5), strength: -1.0 });
        let buf = render(&snap, &cfg);
        // half-size 2|q|+1 = 3
        assert_eq!(pixel(&buf, &cfg, 303, 203), color::NEGATIVE);
        assert_eq!(pixel(&buf, &cfg, 305, 200), [0, 0, 0]);
    }

    #[test]
    fn test_vortex_marker_spins() {
        let a = vortex_triangle((100.0, 100.0), 0.0);
        assert!((a[0].0 - 100.0).abs() < 1e-9);
        assert!((a[0].1 - (100.0 - VORTEX_MARKER_PX)).abs() < 1e-9);
        let b = vortex_triangle((100.0, 100.0), PI / 2.0);
        // top corner swings to the left
        assert!((b[0].0 - (100.0 - VORTEX_MARKER_PX)).abs() < 1e-9);
        assert!((vortex_angle(-0.5, 0.002, 100) + 4.0).abs() < 1e-12);

        let cfg = test_config();
        let mut snap = empty_snap();
        snap.vortices.push(Element { pos: Vec2::new(0.5, 0.5), strength: 0.5 });
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 300, 200), color::NEGATIVE);
    }

    #[test]
    fn test_arrow_brightness_drawn() {
        let cfg = test_config();
        let mut snap = empty_snap();
        snap.arrows.push(ArrowSample { pos: Vec2::new(0.5, 0.5), dir: Vec2::new(1.0, 0.0), speed: 1.0 });
        snap.arrow_levels.push(221);
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 310, 200), [221, 221, 221]);
        assert_eq!(pixel(&buf, &cfg, 290, 200), [0, 0, 0]);

        // fully faded arrows vanish
        snap.arrow_levels[0] = 0;
        let buf = render(&snap, &cfg);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_markers_drawn_over_particles() {
        let cfg = test_config();
        let mut snap = empty_snap();
        snap.particles.push(Vec2::new(0.5, 0.5));
        snap.dipoles.push(Element { pos: Vec2::new(0.5, 0.5), strength: 0.01 });
        let buf = render(&snap, &cfg);
        assert_eq!(pixel(&buf, &cfg, 300, 200), color::POSITIVE);
    }
}
