use nalgebra::{Point2, Vector2};
use opencv::core::{Point, RotatedRect};
use pupil::FittedEllipse;

pub fn rotated_rect_to_ellipse(rect: &RotatedRect) -> FittedEllipse {
    FittedEllipse::new(
        Point2::new(rect.center.x as f64, rect.center.y as f64),
        Vector2::new(rect.size.width as f64, rect.size.height as f64),
        rect.angle as f64,
    )
}

pub fn to_cv_point(p: &Point2<i32>) -> Point {
    Point::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use opencv::core::{Point2f, Size2f};

    use super::*;

    #[test]
    fn rotated_rect_axes_are_full_lengths() {
        let rect = RotatedRect {
            center: Point2f::new(10.0, 20.0),
            size: Size2f::new(40.0, 20.0),
            angle: 30.0,
        };
        let ellipse = rotated_rect_to_ellipse(&rect);

        assert_eq!(ellipse.center, Point2::new(10.0, 20.0));
        assert_eq!(ellipse.axes, Vector2::new(40.0, 20.0));
        assert_eq!(ellipse.angle, 30.0);
        assert!((ellipse.area() - std::f64::consts::PI * 200.0).abs() < 1e-9);
    }
}
