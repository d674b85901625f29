use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::SignupError;

/// Monthly module prices in minor units, keyed by module id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePrices(BTreeMap<String, i64>);

/// Priced selection of distinct modules, in the order first requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub module_ids: Vec<String>,
    pub monthly_price: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected `module=amount` pairs, got `{0}`")]
pub struct ParseModulePricesError(pub String);

impl ModulePrices {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn price_of(&self, module_id: &str) -> Option<i64> {
        self.0.get(module_id).copied()
    }

    /// Price the selected modules. Duplicates are counted once; an unknown id is an
    /// input error. Returns `None` when nothing was selected.
    pub fn quote(&self, module_ids: &[String]) -> Result<Option<Quote>, SignupError> {
        let mut selected: Vec<String> = Vec::new();
        let mut monthly_price = 0;
        for id in module_ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
            if selected.iter().any(|s| s == id) {
                continue;
            }
            let price = self
                .price_of(id)
                .ok_or_else(|| SignupError::invalid(format!("Unknown module: {id}")))?;
            monthly_price += price;
            selected.push(id.to_owned());
        }
        if selected.is_empty() {
            return Ok(None);
        }
        Ok(Some(Quote {
            module_ids: selected,
            monthly_price,
        }))
    }
}

impl FromStr for ModulePrices {
    type Err = ParseModulePricesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (id, amount) = entry
                    .split_once('=')
                    .ok_or_else(|| ParseModulePricesError(entry.to_owned()))?;
                let amount: i64 = amount
                    .trim()
                    .parse()
                    .map_err(|_| ParseModulePricesError(entry.to_owned()))?;
                let id = id.trim();
                if id.is_empty() || amount < 0 {
                    return Err(ParseModulePricesError(entry.to_owned()));
                }
                Ok((id.to_owned(), amount))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Self)
    }
}
