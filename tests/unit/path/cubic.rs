use super::*;
use crate::path::parser::parse_path;

#[test]
fn lines_become_degenerate_cubics() {
    let p = parse_path("M0,0 L10,0 L10,10").unwrap();
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics.len(), 1);
    assert_eq!(
        cubics[0].coords(),
        &[
            0.0, 0.0, //
            0.0, 0.0, 10.0, 0.0, 10.0, 0.0, //
            10.0, 0.0, 10.0, 10.0, 10.0, 10.0,
        ]
    );
    assert_eq!(cubics[0].segment_count(), 2);
}

#[test]
fn close_adds_closing_segment_when_open() {
    let p = parse_path("M0,0 L10,0 L10,10 Z").unwrap();
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics[0].segment_count(), 3);
    let n = cubics[0].len();
    assert_eq!(&cubics[0][n - 6..], &[10.0, 10.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn close_on_start_point_adds_nothing() {
    let p = parse_path("M0,0 L10,0 L0,0 Z").unwrap();
    assert_eq!(to_cubic_paths(&p)[0].segment_count(), 2);
}

#[test]
fn all_cubic_input_is_unchanged() {
    let p = parse_path("M1,2 C3,4 5,6 7,8 C9,10 11,12 1,2 Z").unwrap();
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics.len(), 1);
    assert_eq!(cubics[0].coords(), p.params());
}

#[test]
fn each_moveto_starts_a_subpath_and_lone_points_are_dropped() {
    let p = parse_path("M0,0 M5,5 L6,6 M9,9 Z M20,20 C21,21 22,22 23,23").unwrap();
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics.len(), 2);
    assert_eq!(&cubics[0][..2], &[5.0, 5.0]);
    assert_eq!(&cubics[1][..2], &[20.0, 20.0]);
}

#[test]
fn drawing_after_close_restarts_at_subpath_start() {
    let p = parse_path("M1,1 L5,1 L5,5 Z L1,9").unwrap();
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics.len(), 2);
    assert_eq!(cubics[1].coords(), &[1.0, 1.0, 1.0, 1.0, 1.0, 9.0, 1.0, 9.0]);
}

#[test]
fn buffers_without_moveto_start_at_origin() {
    let mut p = PathBuffer::new();
    p.line_to(3.0, 4.0);
    let cubics = to_cubic_paths(&p);
    assert_eq!(cubics[0].coords(), &[0.0, 0.0, 0.0, 0.0, 3.0, 4.0, 3.0, 4.0]);
}

#[test]
fn every_subpath_has_valid_layout() {
    let p = parse_path("M0,0 Q5,5 10,0 A5,5 0 1 1 0,0 Z m3,3 h4 v4 h-4 z").unwrap();
    for c in to_cubic_paths(&p) {
        assert_eq!((c.len() - 2) % 6, 0);
        assert_eq!(c.points().count(), c.len() / 2);
    }
}

#[test]
fn cubic_path_new_checks_layout() {
    assert!(CubicPath::new(vec![0.0, 0.0]).is_ok());
    assert!(CubicPath::new(vec![0.0; 8]).is_ok());
    assert!(matches!(
        CubicPath::new(vec![0.0; 7]),
        Err(MorphError::InvalidCoordinateCount(7))
    ));
    assert!(CubicPath::new(vec![]).is_err());
}
