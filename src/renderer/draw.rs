/// RGBA canvas borrowed from a frame buffer.
pub struct Canvas<'a> {
    pub buf: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut [u8], width: usize, height: usize) -> Self {
        debug_assert!(buf.len() >= width * height * 4);
        Self { buf, width, height }
    }

    #[inline]
    fn offset(&self, x: isize, y: isize) -> Option<usize> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some((y as usize * self.width + x as usize) * 4)
        } else {
            None
        }
    }

    #[inline]
    pub fn put(&mut self, x: isize, y: isize, color: [u8; 3]) {
        if let Some(off) = self.offset(x, y) {
            self.buf[off] = color[0];
            self.buf[off + 1] = color[1];
            self.buf[off + 2] = color[2];
            self.buf[off + 3] = 255;
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let off = (y * self.width + x) * 4;
        [self.buf[off], self.buf[off + 1], self.buf[off + 2]]
    }

    /// Filled disc. Clipped to the canvas.
    pub fn fill_disc(&mut self, cx: f64, cy: f64, radius: f64, color: [u8; 3]) {
        if !(cx.is_finite() && cy.is_finite() && radius > 0.0) {
            return;
        }
        let r2 = radius * radius;
        let (x0, x1) = ((cx - radius).floor() as isize, (cx + radius).ceil() as isize);
        let (y0, y1) = ((cy - radius).floor() as isize, (cy + radius).ceil() as isize);
        for y in y0.max(0)..=y1.min(self.height as isize - 1) {
            for x in x0.max(0)..=x1.min(self.width as isize - 1) {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Filled axis-aligned square centred on (cx, cy).
    pub fn fill_square(&mut self, cx: f64, cy: f64, half: f64, color: [u8; 3]) {
        if !(cx.is_finite() && cy.is_finite() && half > 0.0) {
            return;
        }
        let x0 = ((cx - half).round() as isize).max(0);
        let x1 = ((cx + half).round() as isize).min(self.width as isize - 1);
        let y0 = ((cy - half).round() as isize).max(0);
        let y1 = ((cy + half).round() as isize).min(self.height as isize - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put(x, y, color);
            }
        }
    }

    /// Filled triangle by pixel-centre edge tests over its bounding box.
    pub fn fill_triangle(&mut self, v: [(f64, f64); 3], color: [u8; 3]) {
        let edge = |a: (f64, f64), b: (f64, f64), p: (f64, f64)| {
            (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
        };
        let area = edge(v[0], v[1], v[2]);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        let min_x = v.iter().map(|p| p.0).fold(f64::INFINITY, f64::min).floor().max(0.0) as isize;
        let max_x = v.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max).ceil() as isize;
        let min_y = v.iter().map(|p| p.1).fold(f64::INFINITY, f64::min).floor().max(0.0) as isize;
        let max_y = v.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max).ceil() as isize;
        for y in min_y..=max_y.min(self.height as isize - 1) {
            for x in min_x..=max_x.min(self.width as isize - 1) {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                let w0 = edge(v[1], v[2], p) * area.signum();
                let w1 = edge(v[2], v[0], p) * area.signum();
                let w2 = edge(v[0], v[1], p) * area.signum();
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Bresenham line drawing with alpha-blended color.
    pub fn draw_line_blended(
        &mut self,
        x0: isize, y0: isize, x1: isize, y1: isize,
        color: [f64; 3], alpha: f64,
        blend: fn(&mut [u8], usize, f64, f64, f64, f64),
    ) {
        let mut cx = x0;
        let mut cy = y0;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx: isize = if x0 < x1 { 1 } else { -1 };
        let sy: isize = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if let Some(off) = self.offset(cx, cy) {
                blend(self.buf, off, color[0], color[1], color[2], alpha);
                self.buf[off + 3] = 255;
            }
            if cx == x1 && cy == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; cx += sx; }
            if e2 <= dx { err += dx; cy += sy; }
        }
    }
}

// Screen blend: result = 1 - (1-bg)(1-fg*alpha) -- always brightens
#[inline]
pub fn screen_blend(buf: &mut [u8], off: usize, r: f64, g: f64, b: f64, alpha: f64) {
    let br = buf[off] as f64;
    let bg = buf[off + 1] as f64;
    let bb = buf[off + 2] as f64;
    let fr = (r * alpha).min(255.0);
    let fg = (g * alpha).min(255.0);
    let fb = (b * alpha).min(255.0);
    buf[off] = (br + fr - br * fr / 255.0).min(255.0) as u8;
    buf[off + 1] = (bg + fg - bg * fg / 255.0).min(255.0) as u8;
    buf[off + 2] = (bb + fb - bb * fb / 255.0).min(255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [255, 0, 0];

    fn blank(w: usize, h: usize) -> Vec<u8> {
        vec![0; w * h * 4]
    }

    fn lit(c: &Canvas) -> usize {
        c.buf.chunks_exact(4).filter(|p| p[0] > 0 || p[1] > 0 || p[2] > 0).count()
    }

    #[test]
    fn test_disc_area_and_clip() {
        let mut buf = blank(40, 40);
        let mut c = Canvas::new(&mut buf, 40, 40);
        c.fill_disc(20.0, 20.0, 5.0, RED);
        let n = lit(&c);
        // π·25 ≈ 78.5
        assert!(n > 65 && n < 95, "disc pixel count {n}");
        assert_eq!(c.pixel(20, 20), RED);
        c.fill_disc(-100.0, -100.0, 3.0, RED);
        assert_eq!(lit(&c), n);
    }

    #[test]
    fn test_square_extent() {
        let mut buf = blank(20, 20);
        let mut c = Canvas::new(&mut buf, 20, 20);
        c.fill_square(10.0, 10.0, 2.0, RED);
        assert_eq!(lit(&c), 25);
        assert_eq!(c.pixel(8, 8), RED);
        assert_eq!(c.pixel(12, 12), RED);
        assert_eq!(c.pixel(13, 10), [0, 0, 0]);
    }

    #[test]
    fn test_triangle_either_winding() {
        for v in [
            [(2.0, 2.0), (18.0, 2.0), (10.0, 18.0)],
            [(2.0, 2.0), (10.0, 18.0), (18.0, 2.0)],
        ] {
            let mut buf = blank(20, 20);
            let mut c = Canvas::new(&mut buf, 20, 20);
            c.fill_triangle(v, RED);
            assert_eq!(c.pixel(10, 6), RED);
            assert_eq!(c.pixel(1, 18), [0, 0, 0]);
        }
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut buf = blank(10, 10);
        let mut c = Canvas::new(&mut buf, 10, 10);
        c.fill_triangle([(1.0, 1.0), (5.0, 5.0), (9.0, 9.0)], RED);
        assert_eq!(lit(&c), 0);
    }

    #[test]
    fn test_line_endpoints_and_clip() {
        let mut buf = blank(10, 10);
        let mut c = Canvas::new(&mut buf, 10, 10);
        c.draw_line_blended(-5, 3, 20, 3, [200.0, 200.0, 200.0], 1.0, screen_blend);
        assert_eq!(lit(&c), 10);
        assert_eq!(c.pixel(0, 3), [200, 200, 200]);
    }
}
