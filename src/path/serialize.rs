use crate::foundation::error::{MorphError, MorphResult};
use crate::path::buffer::write_number;
use crate::path::cubic::check_coordinate_count;

/// Serialize a flat cubic coordinate list as closed absolute path data.
///
/// Output shape: `M x0,y0 C cx1,cy1,cx2,cy2,x,y C ... Z`.
pub fn cubic_path_to_string(coords: &[f64]) -> MorphResult<String> {
    check_coordinate_count(coords.len())?;

    let mut out = String::with_capacity(coords.len() * 8);
    write_cubic(&mut out, coords).map_err(|e| MorphError::Other(e.into()))?;
    Ok(out)
}

fn write_cubic(out: &mut String, coords: &[f64]) -> std::fmt::Result {
    write_coords(out, 'M', &coords[..2])?;
    for seg in coords[2..].chunks_exact(6) {
        out.push(' ');
        write_coords(out, 'C', seg)?;
    }
    out.push_str(" Z");
    Ok(())
}

fn write_coords(out: &mut String, letter: char, values: &[f64]) -> std::fmt::Result {
    out.push(letter);
    out.push(' ');
    for (i, &v) in values.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_number(out, v)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/path/serialize.rs"]
mod tests;
