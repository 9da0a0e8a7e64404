//! Fixtures

use std::{fs, path::PathBuf, str::FromStr};

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    errors::ValidationError,
    fixtures::{
        menu::MenuFixture,
        orders::{FixtureOrder, OrdersFixture},
    },
    menu::Menu,
    money::{Currency, Money},
    orders::policy::OrderPolicy,
};

pub mod menu;
pub mod orders;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid decimal multiplier
    #[error("Invalid multiplier: {0}")]
    InvalidMultiplier(String),

    /// Invalid RFC 3339 timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Menu not loaded yet
    #[error("No menu loaded")]
    NoMenu,

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Fixture data violates a domain rule
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded menu
    menu: Option<Menu>,

    /// Policy from the menu file, or the default policy
    policy: OrderPolicy,

    /// Order requests keyed by name
    orders: FxHashMap<String, FixtureOrder>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            menu: None,
            policy: OrderPolicy::default(),
            orders: FxHashMap::default(),
        }
    }

    /// Load a menu, and its policy if it has one, from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if any price is not in
    /// the menu currency, or if a policy setting is out of range.
    pub fn load_menu(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("menus").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: MenuFixture = serde_norway::from_str(&contents)?;

        let (menu, policy) = fixture.try_into_menu()?;

        self.menu = Some(menu);

        if let Some(policy) = policy {
            self.policy = policy;
        }

        Ok(self)
    }

    /// Load order requests from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an order is invalid.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("orders").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OrdersFixture = serde_norway::from_str(&contents)?;

        for (key, order_fixture) in fixture.orders {
            self.orders.insert(key, order_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load a complete fixture set (menu and orders with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_menu(name)?.load_orders(name)?;

        Ok(fixture)
    }

    /// Get the menu
    ///
    /// # Errors
    ///
    /// Returns an error if no menu has been loaded yet.
    pub fn menu(&self) -> Result<&Menu, FixtureError> {
        self.menu.as_ref().ok_or(FixtureError::NoMenu)
    }

    /// Order policy
    pub fn policy(&self) -> &OrderPolicy {
        &self.policy
    }

    /// Get an order request by its key
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found.
    pub fn order(&self, key: &str) -> Result<&FixtureOrder, FixtureError> {
        self.orders
            .get(key)
            .ok_or_else(|| FixtureError::OrderNotFound(key.to_string()))
    }

    /// Keys of every loaded order, sorted
    pub fn order_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.orders.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse price string (e.g., "16.99 USD") into `Money`
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY", if the
/// amount is not a non-negative decimal, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<Money, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(currency_code)?;

    Money::create(amount, currency).map_err(|_err| FixtureError::InvalidPrice(s.to_string()))
}

/// Parse a currency code (e.g., "USD")
///
/// # Errors
///
/// Returns an error if the code is not one of the supported currencies.
pub fn parse_currency(s: &str) -> Result<Currency, FixtureError> {
    Currency::from_str(s.trim()).map_err(|_err| FixtureError::UnknownCurrency(s.to_string()))
}

/// Parse percentage string (e.g., "10%" or "0.10") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "10%" for 10%
/// - Decimal format: "0.10" for 10%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

/// Parse an RFC 3339 timestamp (e.g., "2026-10-18T18:30:00Z")
///
/// # Errors
///
/// Returns an error if the string is not a valid timestamp.
pub fn parse_timestamp(s: &str) -> Result<Timestamp, FixtureError> {
    s.trim()
        .parse::<Timestamp>()
        .map_err(|_err| FixtureError::InvalidTimestamp(s.to_string()))
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;
    use crate::{
        orders::DeliveryType,
        pizzas::RecipeId,
        pricing::{CustomerType, PricingStrategy},
    };

    fn write_fixture(base: &Path, category: &str, name: &str, contents: &str) -> TestResult {
        let dir = base.join(category);

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_menu_and_orders() -> TestResult {
        let fixture = Fixture::from_set("classic")?;
        let menu = fixture.menu()?;

        assert_eq!(menu.currency(), Currency::Usd);
        assert_eq!(
            menu.recipe(&RecipeId::from("margherita"))?
                .base_price
                .to_cents()?,
            1699
        );
        assert_eq!(menu.seasonal_modifiers().len(), 1);
        assert_eq!(
            fixture.order_keys(),
            ["family_delivery", "vip_happy_hour_pickup"]
        );

        let order = fixture.order("family_delivery")?;

        assert_eq!(order.request.delivery_type, DeliveryType::Delivery);
        assert_eq!(order.strategy, PricingStrategy::Seasonal);

        let vip = fixture.order("vip_happy_hour_pickup")?;

        assert_eq!(vip.request.customer_type, CustomerType::Vip);
        assert!(vip.request.is_happy_hour);
        assert!(vip.request.delivery_address.is_none());

        Ok(())
    }

    #[test]
    fn fixture_missing_pieces_return_errors() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.menu(), Err(FixtureError::NoMenu)));
        assert!(matches!(
            fixture.order("missing"),
            Err(FixtureError::OrderNotFound(key)) if key == "missing"
        ));
    }

    #[test]
    fn fixture_load_menu_reads_policy_and_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "menus",
            "euro",
            "currency: EUR\nrecipes:\n  plain:\n    name: Plain\n    base_price: 9.50 EUR\npolicy:\n  tax_rate: 20%\n  delivery_fee: 3.00 EUR\n",
        )?;

        write_fixture(
            dir.path(),
            "menus",
            "mixed",
            "currency: EUR\nrecipes:\n  plain:\n    name: Plain\n    base_price: 9.50 USD\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_menu("euro")?;

        assert_eq!(fixture.policy().delivery_fee, dec!(3.00));
        assert_eq!(fixture.policy().max_item_quantity, 50);

        let result = fixture.load_menu("mixed");

        assert!(matches!(
            result,
            Err(FixtureError::Validation(ValidationError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_menu_rejects_out_of_range_policy() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_fixture(
            dir.path(),
            "menus",
            "broken",
            "currency: USD\nrecipes:\n  plain:\n    name: Plain\n    base_price: 9.50 USD\npolicy:\n  prep_minutes_per_pizza: 10000000000\n",
        )?;

        write_fixture(
            dir.path(),
            "menus",
            "no_buffer",
            "currency: USD\nrecipes:\n  plain:\n    name: Plain\n    base_price: 9.50 USD\npolicy:\n  buffer_minutes: -500\n",
        )?;

        write_fixture(
            dir.path(),
            "menus",
            "closed",
            "currency: USD\nrecipes:\n  plain:\n    name: Plain\n    base_price: 9.50 USD\npolicy:\n  max_item_quantity: 0\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        for (name, expected) in [
            ("broken", "prep_minutes_per_pizza"),
            ("no_buffer", "buffer_minutes"),
            ("closed", "max_item_quantity"),
        ] {
            assert!(
                matches!(
                    fixture.load_menu(name),
                    Err(FixtureError::Validation(ValidationError::SettingOutOfRange { field, .. })) if field == expected
                ),
                "{name} should be rejected"
            );
        }

        assert!(matches!(fixture.menu(), Err(FixtureError::NoMenu)));

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.menu.is_none());
        assert!(fixture.orders.is_empty());
    }

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        let price = parse_price("16.99 USD")?;

        assert_eq!(price.amount(), dec!(16.99));
        assert_eq!(price.currency(), Currency::Usd);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_bad_input() {
        assert!(matches!(parse_price("16.99USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("-1 USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(
            parse_price("2.99 GBP"),
            Err(FixtureError::UnknownCurrency(code)) if code == "GBP"
        ));
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("10%")?, Percentage::from(0.1));
        assert_eq!(parse_percentage(" 0.15 ")?, Percentage::from(0.15));
        assert!(matches!(
            parse_percentage("ten"),
            Err(FixtureError::InvalidPercentage(_))
        ));

        Ok(())
    }

    #[test]
    fn parse_timestamp_reads_rfc3339() -> TestResult {
        let at = parse_timestamp("2026-10-18T18:30:00Z")?;

        assert_eq!(at.as_second(), 1_792_348_200);
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(FixtureError::InvalidTimestamp(_))
        ));

        Ok(())
    }
}
