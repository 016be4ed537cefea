//! Strategy: el carrito delega el cobro en la estrategia de pago elegida.

use crate::error::{LabError, Result};

pub trait PaymentStrategy {
    fn pay(&self, amount: f64) -> String;
}

pub struct CreditCard;
pub struct Alipay;
pub struct WeChatPay;

impl PaymentStrategy for CreditCard {
    fn pay(&self, amount: f64) -> String {
        format!("paid {:.2} by credit card", amount)
    }
}

impl PaymentStrategy for Alipay {
    fn pay(&self, amount: f64) -> String {
        format!("paid {:.2} with Alipay", amount)
    }
}

impl PaymentStrategy for WeChatPay {
    fn pay(&self, amount: f64) -> String {
        format!("paid {:.2} with WeChat Pay", amount)
    }
}

#[derive(Default)]
pub struct ShoppingCart {
    strategy: Option<Box<dyn PaymentStrategy>>,
}

impl ShoppingCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_payment_strategy(&mut self, strategy: Box<dyn PaymentStrategy>) {
        self.strategy = Some(strategy);
    }

    pub fn checkout(&self, amount: f64) -> Result<String> {
        self.strategy
            .as_ref()
            .map(|strategy| strategy.pay(amount))
            .ok_or(LabError::NoPaymentStrategy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_requires_strategy() {
        assert!(matches!(
            ShoppingCart::new().checkout(10.0),
            Err(LabError::NoPaymentStrategy)
        ));
    }

    #[test]
    fn test_strategy_can_be_swapped() {
        let mut cart = ShoppingCart::new();

        cart.set_payment_strategy(Box::new(CreditCard));
        assert_eq!(cart.checkout(100.0).unwrap(), "paid 100.00 by credit card");

        cart.set_payment_strategy(Box::new(Alipay));
        assert_eq!(cart.checkout(200.5).unwrap(), "paid 200.50 with Alipay");

        cart.set_payment_strategy(Box::new(WeChatPay));
        assert!(cart.checkout(1.0).unwrap().contains("WeChat"));
    }
}
