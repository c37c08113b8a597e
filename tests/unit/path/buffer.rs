use super::*;

fn square() -> PathBuffer {
    let mut p = PathBuffer::new();
    p.move_to(0.0, 0.0);
    p.line_to(10.0, 0.0);
    p.curve_to(10.0, 5.0, 5.0, 10.0, 0.0, 10.0);
    p.close_path();
    p
}

#[test]
fn params_match_command_arity() {
    let p = square();
    let expected: usize = p.commands().iter().map(|c| c.param_count()).sum();
    assert_eq!(expected, p.params().len());
    assert_eq!(p.len(), 4);
    assert_eq!(
        p.commands(),
        &[
            PathCommand::MoveTo,
            PathCommand::LineTo,
            PathCommand::CurveTo,
            PathCommand::ClosePath
        ]
    );
}

#[test]
fn clear_resets_both_lists() {
    let mut p = square();
    p.clear();
    assert!(p.is_empty());
    assert!(p.params().is_empty());
    p.move_to(1.0, 2.0);
    assert_eq!(p.params(), &[1.0, 2.0]);
}

#[test]
fn segments_decode_points() {
    let segs: Vec<_> = square().segments().collect();
    assert_eq!(segs[0], PathSegment::MoveTo(Point::new(0.0, 0.0)));
    assert_eq!(segs[1], PathSegment::LineTo(Point::new(10.0, 0.0)));
    assert_eq!(
        segs[2],
        PathSegment::CurveTo(
            Point::new(10.0, 5.0),
            Point::new(5.0, 10.0),
            Point::new(0.0, 10.0)
        )
    );
    assert_eq!(segs[3], PathSegment::ClosePath);
}

#[test]
fn display_writes_absolute_path_data() {
    let mut p = square();
    p.line_to(-0.0, 2.5);
    assert_eq!(p.to_string(), "M0,0 L10,0 C10,5 5,10 0,10 Z L0,2.5");
}

#[test]
fn bezpath_conversion_keeps_elements() {
    let bp = square().to_bezpath();
    assert_eq!(bp.elements().len(), 4);
}

#[test]
fn set_end_point_only_touches_drawing_commands() {
    let mut p = PathBuffer::new();
    p.move_to(0.0, 0.0);
    p.curve_to(1.0, 1.0, 2.0, 2.0, 2.9999, 3.0001);
    p.set_end_point(3.0, 3.0);
    assert_eq!(&p.params()[6..], &[3.0, 3.0]);

    p.close_path();
    p.set_end_point(9.0, 9.0);
    assert_eq!(&p.params()[6..], &[3.0, 3.0]);
}

#[test]
fn serde_rejects_inconsistent_params() {
    let json = serde_json::to_string(&square()).unwrap();
    let back: PathBuffer = serde_json::from_str(&json).unwrap();
    assert_eq!(back, square());

    let bad = r#"{"commands":["MoveTo","LineTo"],"params":[0,0,1]}"#;
    assert!(serde_json::from_str::<PathBuffer>(bad).is_err());
}
