//! Pizzas
//!
//! Sizes, crusts and the identifiers used to look up recipes and ingredients.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Pizza size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PizzaSize {
    /// Small
    Small,

    /// Medium, the reference size
    Medium,

    /// Large
    Large,

    /// Extra large
    #[serde(rename = "XLARGE")]
    ExtraLarge,
}

impl PizzaSize {
    /// Every size, smallest first.
    pub const ALL: [PizzaSize; 4] = [
        PizzaSize::Small,
        PizzaSize::Medium,
        PizzaSize::Large,
        PizzaSize::ExtraLarge,
    ];

    /// Multiplier applied to a recipe's base price.
    pub fn price_factor(self) -> Decimal {
        match self {
            PizzaSize::Small => dec!(0.8),
            PizzaSize::Medium => Decimal::ONE,
            PizzaSize::Large => dec!(1.3),
            PizzaSize::ExtraLarge => dec!(1.6),
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PizzaSize::Small => "SMALL",
            PizzaSize::Medium => "MEDIUM",
            PizzaSize::Large => "LARGE",
            PizzaSize::ExtraLarge => "XLARGE",
        })
    }
}

/// Pizza crust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Crust {
    /// Thin crust
    Thin,

    /// Traditional hand-stretched crust
    Traditional,

    /// Thick pan crust
    Thick,

    /// Cheese-stuffed crust
    Stuffed,
}

impl fmt::Display for Crust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Crust::Thin => "THIN",
            Crust::Traditional => "TRADITIONAL",
            Crust::Thick => "THICK",
            Crust::Stuffed => "STUFFED",
        })
    }
}

macro_rules! string_key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a key from any string.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self::new(key)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_key_type! {
    /// Recipe Key
    RecipeId
}

string_key_type! {
    /// Ingredient Key
    IngredientId
}
