//! Menu Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    errors::ValidationError,
    fixtures::{FixtureError, parse_currency, parse_percentage, parse_price, parse_timestamp},
    menu::Menu,
    orders::policy::OrderPolicy,
    pizzas::{IngredientId, PizzaSize, RecipeId},
    pricing::seasonal::SeasonalModifier,
};

/// Menu from YAML
#[derive(Debug, Deserialize)]
pub struct MenuFixture {
    /// Currency code every price must use (e.g., "USD")
    pub currency: String,

    /// Map of recipe key -> recipe fixture
    pub recipes: FxHashMap<String, RecipeFixture>,

    /// Map of ingredient key -> ingredient fixture
    #[serde(default)]
    pub ingredients: FxHashMap<String, IngredientFixture>,

    /// Seasonal modifiers, in application order
    #[serde(default)]
    pub seasonal_modifiers: Vec<SeasonalModifierFixture>,

    /// Policy overrides
    #[serde(default)]
    pub policy: Option<PolicyFixture>,
}

/// Recipe Fixture
#[derive(Debug, Deserialize)]
pub struct RecipeFixture {
    /// Recipe name
    pub name: String,

    /// Base price (e.g., "16.99 USD")
    pub base_price: String,
}

/// Ingredient Fixture
#[derive(Debug, Deserialize)]
pub struct IngredientFixture {
    /// Ingredient name
    pub name: String,

    /// Price per portion (e.g., "1.50 USD")
    pub price: String,
}

/// Seasonal Modifier Fixture
#[derive(Debug, Deserialize)]
pub struct SeasonalModifierFixture {
    /// Modifier name
    pub name: String,

    /// Price multiplier (e.g., "1.10")
    pub multiplier: String,

    /// Start of the window, RFC 3339
    pub valid_from: String,

    /// End of the window, RFC 3339
    pub valid_to: String,

    /// Sizes the modifier is limited to, if any
    #[serde(default)]
    pub sizes: Option<Vec<PizzaSize>>,
}

/// Policy Fixture
///
/// Missing fields fall back to [`OrderPolicy::default`].
#[derive(Debug, Default, Deserialize)]
pub struct PolicyFixture {
    /// Tax rate (e.g., "10%")
    pub tax_rate: Option<String>,

    /// Delivery fee (e.g., "5.00 USD")
    pub delivery_fee: Option<String>,

    /// Kitchen minutes per pizza
    pub prep_minutes_per_pizza: Option<i64>,

    /// Courier minutes
    pub delivery_minutes: Option<i64>,

    /// Buffer minutes
    pub buffer_minutes: Option<i64>,

    /// Largest quantity on a single line
    pub max_item_quantity: Option<u32>,
}

impl MenuFixture {
    /// Convert to a `Menu` and the policy overrides, if any
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed or a price is in the wrong currency.
    pub fn try_into_menu(self) -> Result<(Menu, Option<OrderPolicy>), FixtureError> {
        let currency = parse_currency(&self.currency)?;
        let mut menu = Menu::new(currency);

        for (key, recipe) in self.recipes {
            menu.add_recipe(RecipeId::new(key), recipe.name, parse_price(&recipe.base_price)?)?;
        }

        for (key, ingredient) in self.ingredients {
            menu.add_ingredient(
                IngredientId::new(key),
                ingredient.name,
                parse_price(&ingredient.price)?,
            )?;
        }

        for modifier in self.seasonal_modifiers {
            menu.add_seasonal_modifier(modifier.try_into()?);
        }

        let policy = self
            .policy
            .map(|policy| policy.try_into_policy(&menu))
            .transpose()?;

        Ok((menu, policy))
    }
}

impl TryFrom<SeasonalModifierFixture> for SeasonalModifier {
    type Error = FixtureError;

    fn try_from(fixture: SeasonalModifierFixture) -> Result<Self, Self::Error> {
        let multiplier = fixture
            .multiplier
            .trim()
            .parse::<Decimal>()
            .map_err(|_err| FixtureError::InvalidMultiplier(fixture.multiplier.clone()))?;

        let modifier = SeasonalModifier::new(
            fixture.name,
            multiplier,
            parse_timestamp(&fixture.valid_from)?,
            parse_timestamp(&fixture.valid_to)?,
        )?;

        Ok(match fixture.sizes {
            Some(sizes) => modifier.with_sizes(sizes),
            None => modifier,
        })
    }
}

impl PolicyFixture {
    /// Apply the overrides on top of the default policy
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed, a setting is out of range, or the
    /// fee is not in the menu currency.
    pub fn try_into_policy(self, menu: &Menu) -> Result<OrderPolicy, FixtureError> {
        let defaults = OrderPolicy::default();

        let tax_rate = self
            .tax_rate
            .as_deref()
            .map(parse_percentage)
            .transpose()?
            .unwrap_or(defaults.tax_rate);

        let delivery_fee = match self.delivery_fee.as_deref() {
            Some(fee) => {
                let fee = parse_price(fee)?;

                if fee.currency() != menu.currency() {
                    return Err(FixtureError::Validation(ValidationError::CurrencyMismatch {
                        expected: menu.currency().code(),
                        found: fee.currency().code(),
                    }));
                }

                fee.amount()
            }
            None => defaults.delivery_fee,
        };

        Ok(OrderPolicy::new(
            tax_rate,
            delivery_fee,
            self.prep_minutes_per_pizza
                .unwrap_or(defaults.prep_minutes_per_pizza),
            self.delivery_minutes.unwrap_or(defaults.delivery_minutes),
            self.buffer_minutes.unwrap_or(defaults.buffer_minutes),
            self.max_item_quantity.unwrap_or(defaults.max_item_quantity),
        )?)
    }
}
