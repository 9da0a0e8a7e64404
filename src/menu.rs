//! Menu
//!
//! Recipes and ingredients on sale, all priced in a single currency, along with the
//! seasonal modifiers currently configured for the shop.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::{
    errors::ValidationError,
    money::{Currency, Money},
    pizzas::{IngredientId, RecipeId},
    pricing::{items::IngredientPrices, seasonal::SeasonalModifier},
};

/// A pizza on the menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    /// Display name
    pub name: String,

    /// Price of a medium pizza with no extras
    pub base_price: Money,
}

/// An extra topping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    /// Display name
    pub name: String,

    /// Price of one portion
    pub price: Money,
}

/// The shop's menu.
#[derive(Debug, Clone)]
pub struct Menu {
    currency: Currency,
    recipes: FxHashMap<RecipeId, Recipe>,
    ingredients: FxHashMap<IngredientId, Ingredient>,
    seasonal_modifiers: Vec<SeasonalModifier>,
}

impl Menu {
    /// Empty menu priced in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            recipes: FxHashMap::default(),
            ingredients: FxHashMap::default(),
            seasonal_modifiers: Vec::new(),
        }
    }

    /// Add or replace a recipe.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not in the menu currency.
    pub fn add_recipe(
        &mut self,
        id: RecipeId,
        name: impl Into<String>,
        base_price: Money,
    ) -> Result<&mut Self, ValidationError> {
        self.check_currency(base_price)?;

        self.recipes.insert(
            id,
            Recipe {
                name: name.into(),
                base_price,
            },
        );

        Ok(self)
    }

    /// Add or replace an ingredient.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not in the menu currency.
    pub fn add_ingredient(
        &mut self,
        id: IngredientId,
        name: impl Into<String>,
        price: Money,
    ) -> Result<&mut Self, ValidationError> {
        self.check_currency(price)?;

        self.ingredients.insert(
            id,
            Ingredient {
                name: name.into(),
                price,
            },
        );

        Ok(self)
    }

    /// Append a seasonal modifier. Modifiers apply in the order they were added.
    pub fn add_seasonal_modifier(&mut self, modifier: SeasonalModifier) -> &mut Self {
        self.seasonal_modifiers.push(modifier);
        self
    }

    /// Currency of every price on the menu
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Look up a recipe.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownRecipe`] if the recipe is not on the menu.
    pub fn recipe(&self, id: &RecipeId) -> Result<&Recipe, ValidationError> {
        self.recipes
            .get(id)
            .ok_or_else(|| ValidationError::UnknownRecipe(id.to_string()))
    }

    /// Look up an ingredient.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownIngredient`] if the ingredient is not sold.
    pub fn ingredient(&self, id: &IngredientId) -> Result<&Ingredient, ValidationError> {
        self.ingredients
            .get(id)
            .ok_or_else(|| ValidationError::UnknownIngredient(id.to_string()))
    }

    /// Configured seasonal modifiers, in application order
    pub fn seasonal_modifiers(&self) -> &[SeasonalModifier] {
        &self.seasonal_modifiers
    }

    fn check_currency(&self, price: Money) -> Result<(), ValidationError> {
        if price.currency() == self.currency {
            Ok(())
        } else {
            Err(ValidationError::CurrencyMismatch {
                expected: self.currency.code(),
                found: price.currency().code(),
            })
        }
    }
}

impl IngredientPrices for Menu {
    fn ingredient_price(&self, ingredient: &IngredientId) -> Option<Money> {
        self.ingredients.get(ingredient).map(|ingredient| ingredient.price)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn recipes_and_ingredients_can_be_looked_up() -> TestResult {
        let mut menu = Menu::new(Currency::Usd);

        menu.add_recipe(
            RecipeId::from("margherita"),
            "Margherita",
            Money::create(dec!(12.99), Currency::Usd)?,
        )?
        .add_ingredient(
            IngredientId::from("basil"),
            "Fresh basil",
            Money::create(dec!(0.75), Currency::Usd)?,
        )?;

        let recipe = menu.recipe(&RecipeId::from("margherita"))?;

        assert_eq!(recipe.name, "Margherita");
        assert_eq!(recipe.base_price.to_cents()?, 1299);
        assert_eq!(
            menu.ingredient_price(&IngredientId::from("basil"))
                .map(|price| price.amount()),
            Some(dec!(0.75))
        );

        Ok(())
    }

    #[test]
    fn unknown_entries_are_reported() {
        let menu = Menu::new(Currency::Eur);

        assert_eq!(
            menu.recipe(&RecipeId::from("hawaiian")),
            Err(ValidationError::UnknownRecipe("hawaiian".to_string()))
        );
        assert_eq!(
            menu.ingredient(&IngredientId::from("pineapple")),
            Err(ValidationError::UnknownIngredient("pineapple".to_string()))
        );
        assert_eq!(menu.ingredient_price(&IngredientId::from("pineapple")), None);
    }

    #[test]
    fn prices_must_match_menu_currency() -> TestResult {
        let mut menu = Menu::new(Currency::Eur);

        let result = menu.add_recipe(
            RecipeId::from("margherita"),
            "Margherita",
            Money::create(dec!(12.99), Currency::Usd)?,
        );

        assert!(matches!(
            result,
            Err(ValidationError::CurrencyMismatch {
                expected: "EUR",
                found: "USD"
            })
        ));

        Ok(())
    }
}
