use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MorphError::malformed(7, "x")
            .to_string()
            .contains("malformed path data at byte 7:")
    );
    assert!(
        MorphError::InvalidCoordinateCount(5)
            .to_string()
            .contains("invalid coordinate count: 5")
    );
    assert_eq!(
        MorphError::MismatchedAxes { x: 5, y: 4 }.to_string(),
        "mismatched coordinate axes: 5 x values, 4 y values"
    );
    assert!(MorphError::scene("x").to_string().contains("scene error:"));
    assert!(MorphError::config("x").to_string().contains("config error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MorphError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
