//! Decorator: cada agregado envuelve a un café y suma su costo y descripción.

pub trait Coffee {
    fn cost(&self) -> f64;
    fn description(&self) -> String;
}

pub struct SimpleCoffee;

impl Coffee for SimpleCoffee {
    fn cost(&self) -> f64 {
        10.0
    }

    fn description(&self) -> String {
        "simple coffee".to_string()
    }
}

pub struct MilkDecorator<C: Coffee>(pub C);

impl<C: Coffee> Coffee for MilkDecorator<C> {
    fn cost(&self) -> f64 {
        self.0.cost() + 2.0
    }

    fn description(&self) -> String {
        format!("{} + milk", self.0.description())
    }
}

pub struct SugarDecorator<C: Coffee>(pub C);

impl<C: Coffee> Coffee for SugarDecorator<C> {
    fn cost(&self) -> f64 {
        self.0.cost() + 1.0
    }

    fn description(&self) -> String {
        format!("{} + sugar", self.0.description())
    }
}
