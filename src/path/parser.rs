use crate::foundation::core::{Point, Vec2};
use crate::foundation::error::{MorphError, MorphResult};
use crate::path::buffer::PathBuffer;

/// Flattening tolerance used when approximating elliptical arcs with cubics.
pub(crate) const ARC_TOLERANCE: f64 = 0.1;

/// Parse SVG path data into an absolute [`PathBuffer`].
///
/// Relative commands are resolved against the running current point, `H`/`V` become lines,
/// `S`/`Q`/`T` become explicit cubics and `A` is approximated with cubics. Empty or
/// whitespace-only input yields an empty buffer.
#[tracing::instrument(skip(data), fields(len = data.len()))]
pub fn parse_path(data: &str) -> MorphResult<PathBuffer> {
    let mut cur = Cursor::new(data);
    let mut st = ParseState::default();

    cur.skip_separators();
    while let Some(b) = cur.peek() {
        let offset = cur.pos;
        if !b.is_ascii_alphabetic() {
            return Err(if is_number_start(b) {
                MorphError::malformed(offset, "expected a command letter before parameters")
            } else {
                MorphError::malformed(offset, format!("unexpected character '{}'", b as char))
            });
        }
        cur.pos += 1;

        let letter = b as char;
        let rel = letter.is_ascii_lowercase();
        let upper = letter.to_ascii_uppercase();
        if upper == 'Z' {
            st.close();
            cur.skip_separators();
            continue;
        }
        if !matches!(upper, 'M' | 'L' | 'H' | 'V' | 'C' | 'S' | 'Q' | 'T' | 'A') {
            return Err(MorphError::malformed(
                offset,
                format!("unknown command '{letter}'"),
            ));
        }

        // The first parameter set is mandatory; further sets repeat the command
        // (`M` repeats as `L`).
        let mut first = true;
        loop {
            cur.skip_separators();
            if !first && !cur.at_number() {
                break;
            }
            match upper {
                'M' if first => {
                    let p = cur.point(st.origin(rel))?;
                    st.move_to(p);
                }
                'M' | 'L' => {
                    let p = cur.point(st.origin(rel))?;
                    st.line_to(p);
                }
                'H' => {
                    let x = cur.number()?;
                    let x = if rel { st.current.x + x } else { x };
                    st.line_to(Point::new(x, st.current.y));
                }
                'V' => {
                    let y = cur.number()?;
                    let y = if rel { st.current.y + y } else { y };
                    st.line_to(Point::new(st.current.x, y));
                }
                'C' => {
                    let o = st.origin(rel);
                    let c1 = cur.point(o)?;
                    let c2 = cur.point(o)?;
                    let p = cur.point(o)?;
                    st.curve_to(c1, c2, p);
                }
                'S' => {
                    let o = st.origin(rel);
                    let c1 = st.reflected_cubic_ctrl();
                    let c2 = cur.point(o)?;
                    let p = cur.point(o)?;
                    st.curve_to(c1, c2, p);
                }
                'Q' => {
                    let o = st.origin(rel);
                    let q = cur.point(o)?;
                    let p = cur.point(o)?;
                    st.quad_to(q, p);
                }
                'T' => {
                    let q = st.reflected_quad_ctrl();
                    let p = cur.point(st.origin(rel))?;
                    st.quad_to(q, p);
                }
                // 'A'
                _ => {
                    let rx = cur.number()?;
                    let ry = cur.number()?;
                    let rotation_deg = cur.number()?;
                    let large_arc = cur.flag()?;
                    let sweep = cur.flag()?;
                    let p = cur.point(st.origin(rel))?;
                    st.arc_to(Vec2::new(rx.abs(), ry.abs()), rotation_deg, large_arc, sweep, p);
                }
            }
            first = false;
        }
    }

    Ok(st.buffer)
}

fn is_number_start(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-')
}

/// Running state: the absolute buffer plus everything relative and shorthand commands
/// are resolved against.
#[derive(Default)]
struct ParseState {
    buffer: PathBuffer,
    current: Point,
    start: Point,
    prev_cubic_ctrl: Option<Point>,
    prev_quad_ctrl: Option<Point>,
}

impl ParseState {
    fn origin(&self, rel: bool) -> Vec2 {
        if rel { self.current.to_vec2() } else { Vec2::ZERO }
    }

    fn move_to(&mut self, p: Point) {
        self.buffer.move_to(p.x, p.y);
        self.current = p;
        self.start = p;
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = None;
    }

    fn line_to(&mut self, p: Point) {
        self.buffer.line_to(p.x, p.y);
        self.current = p;
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = None;
    }

    fn curve_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.push_cubic(c1, c2, p);
        self.prev_cubic_ctrl = Some(c2);
        self.prev_quad_ctrl = None;
    }

    fn quad_to(&mut self, q: Point, p: Point) {
        let cubic = kurbo::QuadBez::new(self.current, q, p).raise();
        self.push_cubic(cubic.p1, cubic.p2, cubic.p3);
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = Some(q);
    }

    fn arc_to(&mut self, radii: Vec2, rotation_deg: f64, large_arc: bool, sweep: bool, p: Point) {
        // An arc to the current point is omitted entirely.
        if p == self.current {
            return;
        }
        let svg = kurbo::SvgArc {
            from: self.current,
            to: p,
            radii,
            x_rotation: rotation_deg.to_radians(),
            large_arc,
            sweep,
        };
        let Some(arc) = kurbo::Arc::from_svg_arc(&svg) else {
            self.line_to(p);
            return;
        };
        let before = self.buffer.len();
        for el in arc.append_iter(ARC_TOLERANCE) {
            match el {
                kurbo::PathEl::CurveTo(c1, c2, end) => self.push_cubic(c1, c2, end),
                kurbo::PathEl::QuadTo(q, end) => {
                    let c = kurbo::QuadBez::new(self.current, q, end).raise();
                    self.push_cubic(c.p1, c.p2, c.p3);
                }
                kurbo::PathEl::LineTo(end) => {
                    self.buffer.line_to(end.x, end.y);
                    self.current = end;
                }
                kurbo::PathEl::MoveTo(_) | kurbo::PathEl::ClosePath => {}
            }
        }
        if self.buffer.len() == before {
            self.line_to(p);
            return;
        }
        // Land exactly on the requested end point.
        self.buffer.set_end_point(p.x, p.y);
        self.current = p;
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = None;
    }

    fn close(&mut self) {
        self.buffer.close_path();
        self.current = self.start;
        self.prev_cubic_ctrl = None;
        self.prev_quad_ctrl = None;
    }

    fn reflected_cubic_ctrl(&self) -> Point {
        match self.prev_cubic_ctrl {
            Some(c) => self.current + (self.current - c),
            None => self.current,
        }
    }

    fn reflected_quad_ctrl(&self) -> Point {
        match self.prev_quad_ctrl {
            Some(c) => self.current + (self.current - c),
            None => self.current,
        }
    }

    fn push_cubic(&mut self, c1: Point, c2: Point, p: Point) {
        self.buffer.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
        self.current = p;
    }
}

struct Cursor<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn at_number(&self) -> bool {
        self.peek().is_some_and(is_number_start)
    }

    fn point(&mut self, origin: Vec2) -> MorphResult<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y) + origin)
    }

    // Number: [+-]?([0-9]+(.[0-9]*)?|.[0-9]+)([eE][+-]?[0-9]+)?
    fn number(&mut self) -> MorphResult<f64> {
        self.skip_separators();
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let int_start = self.pos;
        self.skip_digits();
        let mut digits = self.pos - int_start;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            let frac_start = self.pos;
            self.skip_digits();
            digits += self.pos - frac_start;
        }
        if digits == 0 {
            return Err(match self.bytes.get(start) {
                Some(&b) => MorphError::malformed(
                    start,
                    format!("expected number, found '{}'", b as char),
                ),
                None => MorphError::malformed(start, "expected number, found end of input"),
            });
        }

        if matches!(self.peek(), Some(b'e' | b'E')) {
            let e_pos = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let exp_start = self.pos;
            self.skip_digits();
            if exp_start == self.pos {
                return Err(MorphError::malformed(
                    e_pos,
                    "invalid number exponent (expected digits)",
                ));
            }
        }

        let v: f64 = self.src[start..self.pos]
            .parse()
            .map_err(|_| MorphError::malformed(start, "invalid number"))?;
        if !v.is_finite() {
            return Err(MorphError::malformed(start, "number out of range"));
        }
        Ok(v)
    }

    fn flag(&mut self) -> MorphResult<bool> {
        self.skip_separators();
        let v = match self.peek() {
            Some(b'0') => false,
            Some(b'1') => true,
            _ => return Err(MorphError::malformed(self.pos, "expected arc flag (0 or 1)")),
        };
        self.pos += 1;
        Ok(v)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/path/parser.rs"]
mod tests;
