#![forbid(unsafe_code)]

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f32, Unit>;
pub type Vector = euclid::Vector2D<f32, Unit>;

pub fn point(x: f32, y: f32) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f32, y: f32) -> Vector {
    euclid::vec2(x, y)
}
