/// HSL to linear RGB, all inputs and outputs in [0, 1].
///
/// This is the classic piecewise conversion; the animated materials
/// call it with s = 1, l = 0.5, where it degenerates to a pure-hue
/// rainbow sweep.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h_prime = (h * 6.0).rem_euclid(6.0);
    let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h_prime as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    [r + m, g + m, b + m]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn test_hsl_to_rgb_red() {
        assert!(close(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_hsl_to_rgb_green() {
        assert!(close(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_hsl_to_rgb_blue() {
        assert!(close(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_hsl_to_rgb_gray_when_desaturated() {
        assert!(close(hsl_to_rgb(0.7, 0.0, 0.5), [0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_hue_wraps_at_one() {
        assert!(close(hsl_to_rgb(1.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5)));
    }

    #[test]
    fn channels_stay_in_unit_range() {
        for i in 0..=100 {
            let rgb = hsl_to_rgb(i as f32 / 100.0, 1.0, 0.5);
            for c in rgb {
                assert!((0.0..=1.0).contains(&c), "channel {c} out of range");
            }
        }
    }
}
