// animation/progression.rs
//
// Progression curves: map linear percent-complete to eased percent-complete.
// Pure math, no knowledge of steps or targets.

use std::f64::consts::PI;

/// Maps a linear percent in [0, 1] to an eased percent.
#[derive(Debug, Clone, Copy, Default)]
pub enum Progression {
    /// Constant velocity.
    #[default]
    Linear,
    /// Symmetric x² / (x² + (1-x)²) curve.
    EaseInOut,
    /// First half of `EaseInOut`, rescaled.
    EaseIn,
    /// Second half of `EaseInOut`, rescaled.
    EaseOut,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Overshoot then settle.
    BackOut,
    /// Bouncy finish.
    BounceOut,
    /// Caller-supplied curve.
    Custom(fn(f64) -> f64),
}

impl Progression {
    /// Apply the curve to `t`, clamped to [0, 1] first.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Progression::Linear => t,
            Progression::EaseInOut => ease_in_out(t),
            Progression::EaseIn => ease_in_out(t / 2.0) * 2.0,
            Progression::EaseOut => (ease_in_out(0.5 + t / 2.0) - 0.5) * 2.0,

            Progression::QuadIn => t * t,
            Progression::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Progression::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }

            Progression::CubicIn => t * t * t,
            Progression::CubicOut => 1.0 - (1.0 - t).powi(3),
            Progression::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }

            Progression::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Progression::SineOut => (t * PI / 2.0).sin(),
            Progression::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            Progression::BackOut => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Progression::BounceOut => bounce_out(t),
            Progression::Custom(f) => f(t),
        }
    }

    /// Look up a built-in curve by name (`"linear"`, `"easeinout"`, `"easein"`,
    /// `"easeout"`, `"quad-in"`, ...). Case and `-`/`_` separators are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let p = match key.as_str() {
            "linear" => Progression::Linear,
            "easeinout" => Progression::EaseInOut,
            "easein" => Progression::EaseIn,
            "easeout" => Progression::EaseOut,
            "quadin" => Progression::QuadIn,
            "quadout" => Progression::QuadOut,
            "quadinout" => Progression::QuadInOut,
            "cubicin" => Progression::CubicIn,
            "cubicout" => Progression::CubicOut,
            "cubicinout" => Progression::CubicInOut,
            "sinein" => Progression::SineIn,
            "sineout" => Progression::SineOut,
            "sineinout" => Progression::SineInOut,
            "backout" => Progression::BackOut,
            "bounceout" => Progression::BounceOut,
            _ => return None,
        };
        Some(p)
    }
}

impl From<fn(f64) -> f64> for Progression {
    fn from(f: fn(f64) -> f64) -> Self {
        Progression::Custom(f)
    }
}

#[inline]
fn ease_in_out(x: f64) -> f64 {
    let a = x * x;
    let b = (1.0 - x) * (1.0 - x);
    a / (a + b)
}

#[inline]
fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Progression; 15] = [
        Progression::Linear,
        Progression::EaseInOut,
        Progression::EaseIn,
        Progression::EaseOut,
        Progression::QuadIn,
        Progression::QuadOut,
        Progression::QuadInOut,
        Progression::CubicIn,
        Progression::CubicOut,
        Progression::CubicInOut,
        Progression::SineIn,
        Progression::SineOut,
        Progression::SineInOut,
        Progression::BackOut,
        Progression::BounceOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for p in ALL {
            assert!(p.apply(0.0).abs() < 1e-9, "{:?} at 0", p);
            assert!((p.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at 1", p);
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        assert!((Progression::EaseInOut.apply(0.5) - 0.5).abs() < 1e-12);
        let a = Progression::EaseInOut.apply(0.2);
        let b = Progression::EaseInOut.apply(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ease_in_starts_slow_ease_out_starts_fast() {
        assert!(Progression::EaseIn.apply(0.25) < 0.25);
        assert!(Progression::EaseOut.apply(0.25) > 0.25);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Progression::Linear.apply(-1.0), 0.0);
        assert_eq!(Progression::Linear.apply(2.0), 1.0);
        assert_eq!(Progression::Linear.apply(f64::NAN), 1.0);
    }

    #[test]
    fn lookup_by_name() {
        assert!(matches!(Progression::from_name("easeinout"), Some(Progression::EaseInOut)));
        assert!(matches!(Progression::from_name("Quad_Out"), Some(Progression::QuadOut)));
        assert!(matches!(Progression::from_name("bounce-out"), Some(Progression::BounceOut)));
        assert!(Progression::from_name("wobble").is_none());
    }

    #[test]
    fn custom_curve() {
        fn cube(t: f64) -> f64 {
            t * t * t
        }
        let p = Progression::from(cube as fn(f64) -> f64);
        assert!((p.apply(0.5) - 0.125).abs() < 1e-12);
    }
}
