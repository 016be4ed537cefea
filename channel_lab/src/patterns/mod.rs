//! # Patrones de diseño
//! src/patterns/mod.rs
//!
//! Versiones mínimas de patrones clásicos expresados con traits.

pub mod account;
pub mod builder;
pub mod command;
pub mod composite;
pub mod decorator;
pub mod factory;
pub mod observer;
pub mod proxy;
pub mod singleton;
pub mod strategy;

pub use account::BankAccount;
pub use builder::{Computer, ComputerBuilder};
pub use command::{Command, Light, LightOffCommand, LightOnCommand, RemoteControl};
pub use composite::{Directory, File, FileSystemComponent};
pub use decorator::{Coffee, MilkDecorator, SimpleCoffee, SugarDecorator};
pub use factory::{new_vehicle, total_area, Car, Circle, Motorcycle, Rectangle, Shape, Vehicle};
pub use observer::{Inbox, Listener, ListenerId, Notifier};
pub use proxy::{AfrikaShopping, AmericanShopping, Goods, KoreaShopping, OverseasProxy, Purchase, Shopping};
pub use singleton::Registry;
pub use strategy::{Alipay, CreditCard, PaymentStrategy, ShoppingCart, WeChatPay};
