//! Encapsulamiento: el saldo sólo cambia a través de operaciones validadas.

use crate::error::{LabError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct BankAccount {
    owner: String,
    balance: f64,
}

impl BankAccount {
    pub fn new(owner: &str, initial_balance: f64) -> Self {
        BankAccount {
            owner: owner.to_string(),
            balance: initial_balance,
        }
    }

    pub fn deposit(&mut self, amount: f64) -> Result<()> {
        if amount <= 0.0 {
            return Err(LabError::InvalidAmount);
        }
        self.balance += amount;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: f64) -> Result<()> {
        if amount <= 0.0 {
            return Err(LabError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(LabError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}
