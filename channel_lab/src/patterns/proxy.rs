//! Proxy: `OverseasProxy` envuelve a cualquier `Shopping`, verifica la
//! autenticidad antes de comprar y pasa por aduana después.

use crate::error::{LabError, Result};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goods {
    pub kind: String,
    /// `false` para mercadería falsa
    pub fact: bool,
}

impl Goods {
    pub fn new(kind: &str, fact: bool) -> Self {
        Goods {
            kind: kind.to_string(),
            fact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub item: String,
    pub origin: &'static str,
    pub customs_checked: bool,
}

pub trait Shopping {
    fn buy(&self, goods: &Goods) -> Result<Purchase>;
}

fn purchase(goods: &Goods, origin: &'static str) -> Result<Purchase> {
    Ok(Purchase {
        item: goods.kind.clone(),
        origin,
        customs_checked: false,
    })
}

pub struct KoreaShopping;
pub struct AmericanShopping;
pub struct AfrikaShopping;

impl Shopping for KoreaShopping {
    fn buy(&self, goods: &Goods) -> Result<Purchase> {
        purchase(goods, "Korea")
    }
}

impl Shopping for AmericanShopping {
    fn buy(&self, goods: &Goods) -> Result<Purchase> {
        purchase(goods, "America")
    }
}

impl Shopping for AfrikaShopping {
    fn buy(&self, goods: &Goods) -> Result<Purchase> {
        purchase(goods, "Afrika")
    }
}

pub struct OverseasProxy {
    shopping: Box<dyn Shopping + Send + Sync>,
}

impl OverseasProxy {
    pub fn new(shopping: Box<dyn Shopping + Send + Sync>) -> Self {
        OverseasProxy { shopping }
    }

    /// Elige el destino según la mercadería: lo auténtico se compra en Corea.
    pub fn for_goods(goods: &Goods) -> Self {
        if goods.fact {
            Self::new(Box::new(KoreaShopping))
        } else {
            Self::new(Box::new(AfrikaShopping))
        }
    }

    fn distinguish(&self, goods: &Goods) -> Result<()> {
        info!(item = %goods.kind, "checking authenticity");
        if goods.fact {
            Ok(())
        } else {
            Err(LabError::Counterfeit {
                item: goods.kind.clone(),
            })
        }
    }

    fn check(&self, mut purchase: Purchase) -> Purchase {
        info!(item = %purchase.item, origin = purchase.origin, "customs check passed");
        purchase.customs_checked = true;
        purchase
    }
}

impl Shopping for OverseasProxy {
    fn buy(&self, goods: &Goods) -> Result<Purchase> {
        self.distinguish(goods)?;
        let purchase = self.shopping.buy(goods)?;
        Ok(self.check(purchase))
    }
}
