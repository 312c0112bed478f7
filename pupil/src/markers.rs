use nalgebra::Point2;

/// Fixation targets as fractions of the canvas width and height.
pub const LANDMARKS: [(f64, f64); 5] = [(0.1, 0.1), (0.1, 0.9), (0.5, 0.5), (0.9, 0.9), (0.9, 0.1)];

/// Half of the diagonal extent of a cross, in pixels.
pub const CROSS_ARM: i32 = 20;

pub type Segment = (Point2<i32>, Point2<i32>);

pub fn landmark_centers(width: i32, height: i32) -> Vec<Point2<i32>> {
    LANDMARKS
        .iter()
        .map(|&(fx, fy)| Point2::new((fx * width as f64).round() as i32, (fy * height as f64).round() as i32))
        .collect()
}

/// Both diagonals of an "X" centered on `center`.
pub fn cross(center: Point2<i32>, arm: i32) -> [Segment; 2] {
    let (x, y) = (center.x, center.y);
    [
        (Point2::new(x + arm, y + arm), Point2::new(x - arm, y - arm)),
        (Point2::new(x - arm, y + arm), Point2::new(x + arm, y - arm)),
    ]
}

pub fn landmark_crosses(width: i32, height: i32) -> Vec<Segment> {
    landmark_centers(width, height)
        .into_iter()
        .flat_map(|c| cross(c, CROSS_ARM))
        .collect()
}
