//! 地理距离计算
//!
//! 使用球面余弦定律计算两坐标之间的大圆距离（法定英里）。

use crate::models::Location;

/// 每海里对应的法定英里数
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// 计算两坐标之间的距离（法定英里）
///
/// 浮点误差可能让 acos 的参数略大于 1.0，计算前将其钳制到 [-1, 1]。
pub fn distance(a: &Location, b: &Location) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lon1 = a.longitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let lon2 = b.longitude.to_radians();

    let cos_angle = (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos())
        .clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    let nautical_miles = 60.0 * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}

/// 两坐标距离是否在阈值以内（含边界）
pub fn is_within(a: &Location, b: &Location, threshold_miles: f64) -> bool {
    distance(a, b) <= threshold_miles
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn disneyland() -> Location {
        Location::new(33.817595, -117.922008)
    }

    fn jackson_hole() -> Location {
        Location::new(43.582767, -110.821999)
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let points = [
            disneyland(),
            jackson_hole(),
            Location::new(0.0, 0.0),
            Location::new(-85.05112878, 180.0),
            Location::new(89.999, -179.999),
        ];
        for point in points {
            assert_eq!(distance(&point, &point), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = disneyland();
        let b = jackson_hole();
        assert!((distance(&a, &b) - distance(&b, &a)).abs() < EPSILON);
    }

    #[test]
    fn test_distance_known_values() {
        // 赤道上经度相差 1 度 = 60 海里
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 1.0);
        let expected = 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE;
        assert!((distance(&a, &b) - expected).abs() < 1e-6);

        // Disneyland 到 Jackson Hole 约 760 英里
        let d = distance(&disneyland(), &jackson_hole());
        assert!(d > 700.0 && d < 800.0, "unexpected distance {}", d);
    }

    #[test]
    fn test_distance_antipodal_is_finite() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 180.0);
        let d = distance(&a, &b);
        assert!(d.is_finite());
        // 半个大圆 = 180 * 60 海里
        assert!((d - 180.0 * 60.0 * STATUTE_MILES_PER_NAUTICAL_MILE).abs() < 1e-6);
    }

    #[test]
    fn test_nearly_identical_points_do_not_produce_nan() {
        let a = Location::new(33.817595, -117.922008);
        let b = Location::new(33.817595, -117.922008 + 1e-12);
        let d = distance(&a, &b);
        assert!(d.is_finite());
        assert!(d >= 0.0);
        assert!(d < 0.01);
    }

    #[test]
    fn test_is_within_boundary_inclusive() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 1.0);
        let d = distance(&a, &b);
        assert!(is_within(&a, &b, d));
        assert!(!is_within(&a, &b, d - 1e-6));
        assert!(is_within(&a, &a, 0.0));
    }
}
