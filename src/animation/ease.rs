use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Base timing curves. Each one is an "in" curve; [`Ease`] derives the "out" and "in/out"
/// variants from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EaseCurve {
    /// `t^2`
    Quad,
    /// `t^3`
    Cubic,
    /// `t^4`
    Quart,
    /// `t^5`
    Quint,
    /// Quarter sine wave.
    Sine,
    /// Quarter circle.
    Circ,
    /// Exponential.
    Expo,
    /// Slight pull back before moving forward.
    Back,
    /// Damped oscillation.
    Elastic,
    /// Bouncing ball.
    Bounce,
}

impl EaseCurve {
    const ALL: [Self; 10] = [
        Self::Quad,
        Self::Cubic,
        Self::Quart,
        Self::Quint,
        Self::Sine,
        Self::Circ,
        Self::Expo,
        Self::Back,
        Self::Elastic,
        Self::Bounce,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Quad => "quad",
            Self::Cubic => "cubic",
            Self::Quart => "quart",
            Self::Quint => "quint",
            Self::Sine => "sine",
            Self::Circ => "circ",
            Self::Expo => "expo",
            Self::Back => "back",
            Self::Elastic => "elastic",
            Self::Bounce => "bounce",
        }
    }

    /// Older spelling still accepted when parsing.
    fn alias(self) -> Option<&'static str> {
        match self {
            Self::Cubic => Some("cube"),
            _ => None,
        }
    }

    /// Evaluate the base ("in") curve.
    pub fn eval(self, t: f64) -> f64 {
        match self {
            Self::Quad => t.powi(2),
            Self::Cubic => t.powi(3),
            Self::Quart => t.powi(4),
            Self::Quint => t.powi(5),
            Self::Sine => 1.0 - ((1.0 - t) * PI / 2.0).sin(),
            Self::Circ => 1.0 - (1.0 - t * t).sqrt(),
            Self::Expo => 2f64.powf(8.0 * (t - 1.0)),
            Self::Back => t * t * (2.616 * t - 1.616),
            Self::Elastic => {
                let t = t - 1.0;
                2f64.powf(10.0 * t) * (20.0 * t * PI / 3.0).cos()
            }
            Self::Bounce => bounce(t),
        }
    }
}

fn bounce(t: f64) -> f64 {
    // The band thresholds approach -1/11, so negative input would never terminate.
    let t = t.max(0.0);
    let mut a = 0.0;
    let mut b = 1.0;
    loop {
        if t >= (7.0 - 4.0 * a) / 11.0 {
            let c = (11.0 - 6.0 * a - 11.0 * t) / 4.0;
            return b * b - c * c;
        }
        a += b;
        b /= 2.0;
    }
}

/// Timing function mapping progress `t` (nominally `[0, 1]`) to eased progress.
///
/// Output may overshoot `[0, 1]` for `back` and `elastic`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Ease {
    /// Identity.
    #[default]
    Linear,
    /// The base curve.
    In(EaseCurve),
    /// The base curve mirrored in time and value.
    Out(EaseCurve),
    /// First half `In`, second half `Out`.
    InOut(EaseCurve),
}

impl Ease {
    /// Apply this easing function to progress `t`.
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::In(c) => c.eval(t),
            Self::Out(c) => 1.0 - c.eval(1.0 - t),
            Self::InOut(c) => {
                if t <= 0.5 {
                    c.eval(2.0 * t) / 2.0
                } else {
                    (2.0 - c.eval(2.0 * (1.0 - t))) / 2.0
                }
            }
        }
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::In(c) => write!(f, "{}In", c.name()),
            Self::Out(c) => write!(f, "{}Out", c.name()),
            Self::InOut(c) => write!(f, "{}InOut", c.name()),
        }
    }
}

impl FromStr for Ease {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "linear" {
            return Ok(Self::Linear);
        }
        for c in EaseCurve::ALL {
            let mode = s
                .strip_prefix(c.name())
                .or_else(|| c.alias().and_then(|a| s.strip_prefix(a)));
            let Some(mode) = mode else {
                continue;
            };
            match mode {
                "In" => return Ok(Self::In(c)),
                "Out" => return Ok(Self::Out(c)),
                "InOut" => return Ok(Self::InOut(c)),
                _ => {}
            }
        }
        Err(format!("unknown easing \"{s}\""))
    }
}

impl serde::Serialize for Ease {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Ease {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
