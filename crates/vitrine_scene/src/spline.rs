use glam::Vec3;

/// Uniform Catmull-Rom through a fixed set of control points. Missing
/// neighbors at the ends are clamped to the first and last points, so
/// the curve starts and ends exactly on them. The desk cable is the
/// only consumer.
pub struct CatmullRom {
    points: Vec<Vec3>,
}

impl CatmullRom {
    pub fn new(points: &[Vec3]) -> Self {
        assert!(points.len() >= 2, "spline needs at least two points");
        Self {
            points: points.to_vec(),
        }
    }

    fn control(&self, i: isize) -> Vec3 {
        let last = self.points.len() as isize - 1;
        self.points[i.clamp(0, last) as usize]
    }

    /// Evaluate at t in [0, 1] across the whole chain.
    pub fn sample(&self, t: f32) -> Vec3 {
        let spans = (self.points.len() - 1) as f32;
        let scaled = t.clamp(0.0, 1.0) * spans;
        let span = (scaled.floor() as isize).min(self.points.len() as isize - 2);
        let u = scaled - span as f32;

        let p0 = self.control(span - 1);
        let p1 = self.control(span);
        let p2 = self.control(span + 1);
        let p3 = self.control(span + 2);

        let u2 = u * u;
        let u3 = u2 * u;
        0.5 * ((2.0 * p1)
            + (p2 - p0) * u
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * u2
            + (3.0 * p1 - 3.0 * p2 + p3 - p0) * u3)
    }

    /// Evenly spaced samples, endpoints included.
    pub fn sample_points(&self, count: usize) -> Vec<Vec3> {
        let count = count.max(2);
        (0..count)
            .map(|i| self.sample(i as f32 / (count - 1) as f32))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_all_control_points() {
        let controls = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(3.0, -0.5, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        ];
        let spline = CatmullRom::new(&controls);
        for (i, expected) in controls.iter().enumerate() {
            let t = i as f32 / (controls.len() - 1) as f32;
            assert!(
                (spline.sample(t) - *expected).length() < 1e-4,
                "control point {i} missed"
            );
        }
    }

    #[test]
    fn samples_are_endpoint_inclusive() {
        let spline = CatmullRom::new(&[Vec3::ZERO, Vec3::ONE]);
        let pts = spline.sample_points(10);
        assert_eq!(pts.len(), 10);
        assert!((pts[0] - Vec3::ZERO).length() < 1e-6);
        assert!((pts[9] - Vec3::ONE).length() < 1e-6);
    }
}
