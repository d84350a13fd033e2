use std::fmt;
use std::str::FromStr;

use cosmos_sdk_proto::cosmos::base::v1beta1::Coin;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::{Error, Result};

/// Fee rate offered per unit of gas, e.g. `0.025uosmo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasPrice {
    pub amount: Decimal,
    pub denom: String,
}

impl GasPrice {
    /// Fee for `gas_limit`, rounded up to a whole base unit.
    pub fn fee_for(&self, gas_limit: u64) -> Result<Coin> {
        let fee = self
            .amount
            .checked_mul(Decimal::from(gas_limit))
            .map(|x| x.ceil())
            .and_then(|x| x.to_u128())
            .ok_or_else(|| Error::gas(&self.to_string(), format!("fee overflow at gas {gas_limit}")))?;
        Ok(Coin {
            denom: self.denom.clone(),
            amount: fee.to_string(),
        })
    }
}

// denom rules follow the SDK: a letter, then 2..=127 of [a-zA-Z0-9/:._-]
fn valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && (3..=128).contains(&denom.len())
        && chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c))
}

impl FromStr for GasPrice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(|| Error::gas(s, "missing denom"))?;
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(Error::gas(s, "missing amount"));
        }
        if !valid_denom(denom) {
            return Err(Error::gas(s, format!("invalid denom `{denom}`")));
        }
        let amount = Decimal::from_str(amount).map_err(|e| Error::gas(s, e.to_string()))?;
        Ok(Self {
            amount,
            denom: denom.into(),
        })
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}
