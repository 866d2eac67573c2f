//! Catalog value types: identifiers, money, prices and products.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Globally unique product identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Wrap a backend identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Amount in whole currency units.
///
/// Addition saturates, so totals never wrap.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero units
    pub const ZERO: Self = Self(0);

    /// Create an amount
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// Whole units
    #[must_use]
    pub const fn units(self) -> u64 {
        self.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} синапсов", self.0)
    }
}

/// Price of a product. On the wire a number, or `null` when not for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Money>", into = "Option<Money>")]
pub enum Price {
    /// Purchasable at this amount
    Amount(Money),
    /// Listed but cannot be bought
    NotForSale,
}

impl Price {
    /// The amount, if the product can be bought
    #[must_use]
    pub const fn amount(self) -> Option<Money> {
        match self {
            Self::Amount(money) => Some(money),
            Self::NotForSale => None,
        }
    }

    /// Whether the product can be bought
    #[must_use]
    pub const fn is_for_sale(self) -> bool {
        matches!(self, Self::Amount(_))
    }

    /// Contribution to a cart total; `NotForSale` counts as zero
    #[must_use]
    pub const fn contribution(self) -> Money {
        match self {
            Self::Amount(money) => money,
            Self::NotForSale => Money::ZERO,
        }
    }
}

impl From<Option<Money>> for Price {
    fn from(value: Option<Money>) -> Self {
        value.map_or(Self::NotForSale, Self::Amount)
    }
}

impl From<Price> for Option<Money> {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

/// Catalog category. The backend uses a fixed set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// "софт-скил"
    #[serde(rename = "софт-скил")]
    SoftSkill,
    /// "хард-скил"
    #[serde(rename = "хард-скил")]
    HardSkill,
    /// "кнопка"
    #[serde(rename = "кнопка")]
    Button,
    /// "дополнительное"
    #[serde(rename = "дополнительное")]
    Additional,
    /// "другое"
    #[serde(rename = "другое")]
    Other,
}

impl Category {
    /// The backend label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SoftSkill => "софт-скил",
            Self::HardSkill => "хард-скил",
            Self::Button => "кнопка",
            Self::Additional => "дополнительное",
            Self::Other => "другое",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalog entry. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Backend identifier
    pub id: ProductId,
    /// Display title
    pub title: String,
    /// Long description
    pub description: String,
    /// Category label
    pub category: Category,
    /// Absolute image URL
    pub image: String,
    /// Price, or not for sale
    pub price: Price,
}
