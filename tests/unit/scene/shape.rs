use super::*;
use crate::path::buffer::PathCommand;
use std::f64::consts::PI;

#[test]
fn defaults_match_canvas_shapes() {
    let r = RectShape::default();
    assert_eq!((r.width, r.height), (10.0, 10.0));
    let a = ArcShape::default();
    assert_eq!(a.radius, 10.0);
    assert_eq!(a.end_angle, TAU);
    assert!(!a.anticlockwise);

    assert_eq!(Shape::arc(a).visual.fill, Some(Color::RED));
    assert_eq!(Shape::arc(a).visual.stroke, Some(Color::BLACK));
    assert_eq!(Shape::path(PathBuffer::new()).visual, VisualAttrs::default());
    assert_eq!(VisualAttrs::default().line_width, 1.0);
}

#[test]
fn builders_layer_over_defaults() {
    let r = RectShape::default().with_position(5.0, 6.0).with_size(1.0, 2.0);
    assert_eq!(r, RectShape { x: 5.0, y: 6.0, width: 1.0, height: 2.0 });

    let v = VisualAttrs::SOLID.with_fill(None).with_line_width(3.0);
    assert_eq!(v.fill, None);
    assert_eq!(v.stroke, Some(Color::BLACK));
    assert_eq!(v.line_width, 3.0);

    let v: VisualAttrs = serde_json::from_str(r##"{"fill":"#00ff00"}"##).unwrap();
    assert_eq!(v.fill, Some(Color::rgba(0.0, 1.0, 0.0, 1.0)));
    assert_eq!(v.line_width, 1.0);
}

#[test]
fn rect_outline_is_closed() {
    let p = RectShape::default().with_position(1.0, 2.0).outline();
    assert_eq!(p.to_string(), "M1,2 L11,2 L11,12 L1,12 Z");
}

#[test]
fn arc_sweep_follows_canvas_rules() {
    let a = ArcShape::default();
    assert_eq!(a.sweep(), TAU);
    assert_eq!(a.with_angles(0.0, 5.0 * PI).sweep(), TAU);
    assert!((a.with_angles(0.0, -PI / 2.0).sweep() - 1.5 * PI).abs() < 1e-12);
    assert!((a.with_angles(0.0, PI).with_anticlockwise(true).sweep() + PI).abs() < 1e-12);
    assert_eq!(a.with_angles(1.0, 1.0).sweep(), 0.0);
}

#[test]
fn arc_outline_starts_and_ends_on_the_circle() {
    let p = ArcShape::default().with_center(50.0, 50.0).outline();
    assert_eq!(p.commands()[0], PathCommand::MoveTo);
    assert!(p.commands()[1..].iter().all(|&c| c == PathCommand::CurveTo));
    assert_eq!(&p.params()[..2], &[60.0, 50.0]);
    let n = p.params().len();
    let end = Point::new(p.params()[n - 2], p.params()[n - 1]);
    assert!(end.distance(Point::new(60.0, 50.0)) < 1e-9);

    let empty = ArcShape::default().with_radius(0.0).outline();
    assert_eq!(empty.len(), 1);
}

#[test]
fn rect_hit_testing() {
    let s = Shape::rect(RectShape::default());
    assert!(s.hit_test(Point::new(5.0, 5.0)));
    assert!(!s.hit_test(Point::new(15.0, 5.0)));

    assert!(s.hit_test_stroke(Point::new(10.4, 5.0)));
    assert!(!s.hit_test_stroke(Point::new(10.6, 5.0)));
    assert!(!s.hit_test_stroke(Point::new(5.0, 5.0)));

    let wide = s.with_visual(VisualAttrs::SOLID.with_line_width(4.0));
    assert!(wide.hit_test_stroke(Point::new(11.9, 5.0)));
}

#[test]
fn arc_hit_testing() {
    let full = Shape::arc(ArcShape::default());
    assert!(full.hit_test(Point::new(0.0, 0.0)));
    assert!(full.hit_test(Point::new(0.0, 9.0)));
    assert!(!full.hit_test(Point::new(11.0, 0.0)));
    assert!(full.hit_test_stroke(Point::new(0.0, 10.0)));
    assert!(!full.hit_test_stroke(Point::new(0.0, 0.0)));

    // Half disc below the x axis (y points down); the chord closes it.
    let half = Shape::arc(ArcShape::default().with_angles(0.0, PI));
    assert!(half.hit_test(Point::new(0.0, 5.0)));
    assert!(!half.hit_test(Point::new(0.0, -5.0)));

    let upper = Shape::arc(ArcShape::default().with_angles(0.0, PI).with_anticlockwise(true));
    assert!(upper.hit_test(Point::new(0.0, -5.0)));
    assert!(!upper.hit_test(Point::new(0.0, 5.0)));
}

#[test]
fn open_paths_fill_as_if_closed() {
    let tri = Shape::path("M0,0 L10,0 L10,10".parse().unwrap());
    assert!(tri.hit_test(Point::new(8.0, 2.0)));
    assert!(!tri.hit_test(Point::new(2.0, 8.0)));
    // The implicit closing edge is not stroked.
    assert!(!tri.hit_test_stroke(Point::new(5.0, 5.0)));
    assert!(tri.hit_test_stroke(Point::new(10.0, 5.0)));
}

#[test]
fn nonzero_rule_fills_overlaps() {
    // Two same-direction squares, the inner one nested: still filled under non-zero.
    let s = Shape::path("M0,0 H20 V20 H0 Z M5,5 H15 V15 H5 Z".parse().unwrap());
    assert!(s.hit_test(Point::new(10.0, 10.0)));
    // Opposite direction punches a hole.
    let s = Shape::path("M0,0 H20 V20 H0 Z M5,5 V15 H15 V5 Z".parse().unwrap());
    assert!(!s.hit_test(Point::new(10.0, 10.0)));
    assert!(s.hit_test(Point::new(2.0, 2.0)));
}

#[test]
fn groups_are_never_hit() {
    let g = Shape::group();
    assert!(g.outline().is_none());
    assert!(!g.hit_test(Point::ZERO));
    assert!(!g.hit_test_stroke(Point::ZERO));
}

#[test]
fn lone_points_hit_only_at_the_point() {
    let dot = Shape::arc(ArcShape::default().with_radius(0.0).with_center(3.0, 3.0))
        .with_visual(VisualAttrs::SOLID.with_line_width(2.0));
    assert!(dot.hit_test_stroke(Point::new(3.5, 3.0)));
    assert!(!dot.hit_test_stroke(Point::new(5.0, 3.0)));
}
