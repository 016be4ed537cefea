//! Polimorfismo con traits y una fábrica que elige la implementación por nombre.

use std::f64::consts::PI;

pub trait Shape {
    fn area(&self) -> f64;
    fn perimeter(&self) -> f64;
}

pub struct Circle {
    pub radius: f64,
}

pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn perimeter(&self) -> f64 {
        2.0 * PI * self.radius
    }
}

impl Shape for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }
}

pub fn total_area(shapes: &[Box<dyn Shape>]) -> f64 {
    shapes.iter().map(|s| s.area()).sum()
}

pub trait Vehicle {
    fn drive(&self) -> String;
    fn kind(&self) -> &'static str;
}

pub struct Car {
    pub brand: String,
}

pub struct Motorcycle {
    pub brand: String,
}

impl Vehicle for Car {
    fn drive(&self) -> String {
        format!("driving a {} car", self.brand)
    }

    fn kind(&self) -> &'static str {
        "car"
    }
}

impl Vehicle for Motorcycle {
    fn drive(&self) -> String {
        format!("riding a {} motorcycle", self.brand)
    }

    fn kind(&self) -> &'static str {
        "motorcycle"
    }
}

/// `None` para tipos desconocidos
pub fn new_vehicle(kind: &str, brand: &str) -> Option<Box<dyn Vehicle>> {
    let brand = brand.to_string();
    match kind {
        "car" => Some(Box::new(Car { brand })),
        "motorcycle" => Some(Box::new(Motorcycle { brand })),
        _ => None,
    }
}
