//! Typed view over the `applications` and `standalone_services` entries that
//! checkout stores as JSON strings inside payment metadata.

use crate::domain::status::ItemType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub const APPLICATIONS_KEY: &str = "applications";
pub const STANDALONE_SERVICES_KEY: &str = "standalone_services";

fn default_quantity() -> i32 {
    1
}

/// A company-formation application purchased at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLineItem {
    #[serde(alias = "jurisdictionName", alias = "jurisdiction_name")]
    pub jurisdiction: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(
        default,
        alias = "companyName",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A standalone service (registered agent, nominee director, ...) purchased at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLineItem {
    #[serde(alias = "serviceName", alias = "service_name", alias = "title")]
    pub name: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "item_type", rename_all = "lowercase")]
pub enum LineItem {
    Application(ApplicationLineItem),
    Service(ServiceLineItem),
}

impl LineItem {
    pub fn item_type(&self) -> ItemType {
        match self {
            LineItem::Application(_) => ItemType::Application,
            LineItem::Service(_) => ItemType::Service,
        }
    }

    pub fn name(&self) -> String {
        match self {
            LineItem::Application(app) => format!("{} company formation", app.jurisdiction),
            LineItem::Service(service) => service.name.clone(),
        }
    }

    pub fn unit_price(&self) -> Decimal {
        match self {
            LineItem::Application(app) => app.price,
            LineItem::Service(service) => service.price,
        }
    }

    pub fn quantity(&self) -> i32 {
        match self {
            LineItem::Application(app) => app.quantity,
            LineItem::Service(service) => service.quantity,
        }
    }

    pub fn total_price(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity())
    }

    /// Everything checkout sent for this line, kept verbatim for the item row.
    pub fn metadata(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }
}

/// Outcome of reading one metadata field. Malformed input is kept as
/// `Unparsed` so it stays visible in the order snapshot instead of
/// collapsing into an empty list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ParsedLineItems<T> {
    Parsed { items: Vec<T> },
    Unparsed { raw: String, reason: String },
}

impl<T> ParsedLineItems<T> {
    pub fn items(&self) -> &[T] {
        match self {
            ParsedLineItems::Parsed { items } => items,
            ParsedLineItems::Unparsed { .. } => &[],
        }
    }

    pub fn unparsed_reason(&self) -> Option<&str> {
        match self {
            ParsedLineItems::Parsed { .. } => None,
            ParsedLineItems::Unparsed { reason, .. } => Some(reason),
        }
    }
}

trait PricedLine {
    fn price(&self) -> Decimal;
    fn quantity(&self) -> i32;
}

impl PricedLine for ApplicationLineItem {
    fn price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

impl PricedLine for ServiceLineItem {
    fn price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> i32 {
        self.quantity
    }
}

fn parse_field<T>(raw: Option<&String>) -> ParsedLineItems<T>
where
    T: DeserializeOwned + PricedLine,
{
    let Some(raw) = raw.map(|r| r.trim()).filter(|r| !r.is_empty()) else {
        return ParsedLineItems::Parsed { items: Vec::new() };
    };

    let items: Vec<T> = match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            return ParsedLineItems::Unparsed {
                raw: raw.to_string(),
                reason: e.to_string(),
            };
        }
    };

    if let Some((index, _)) = items
        .iter()
        .enumerate()
        .find(|(_, item)| item.price().is_sign_negative() || item.quantity() < 1)
    {
        return ParsedLineItems::Unparsed {
            raw: raw.to_string(),
            reason: format!("entry {index} has a negative price or a quantity below 1"),
        };
    }

    ParsedLineItems::Parsed { items }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItemSnapshot {
    pub applications: ParsedLineItems<ApplicationLineItem>,
    pub standalone_services: ParsedLineItems<ServiceLineItem>,
}

fn count_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

impl LineItemSnapshot {
    pub fn from_metadata(metadata: &HashMap<String, String>) -> Self {
        Self {
            applications: parse_field(metadata.get(APPLICATIONS_KEY)),
            standalone_services: parse_field(metadata.get(STANDALONE_SERVICES_KEY)),
        }
    }

    pub fn applications_count(&self) -> i32 {
        count_i32(self.applications.items().len())
    }

    pub fn services_count(&self) -> i32 {
        count_i32(self.standalone_services.items().len())
    }

    /// Field names whose JSON could not be read, with the parser's reason.
    pub fn unparsed_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = Vec::new();
        if let Some(reason) = self.applications.unparsed_reason() {
            fields.push((APPLICATIONS_KEY, reason));
        }
        if let Some(reason) = self.standalone_services.unparsed_reason() {
            fields.push((STANDALONE_SERVICES_KEY, reason));
        }
        fields
    }

    /// Each parsed line with its position among lines of the same type.
    pub fn line_items(&self) -> Vec<(i32, LineItem)> {
        let applications = self
            .applications
            .items()
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, app)| (count_i32(i), LineItem::Application(app)));

        let services = self
            .standalone_services
            .items()
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, service)| (count_i32(i), LineItem::Service(service)));

        applications.chain(services).collect()
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_applications_and_services() {
        let snapshot = LineItemSnapshot::from_metadata(&metadata(&[
            (
                APPLICATIONS_KEY,
                r#"[{"jurisdiction":"BVI","price":599,"companyName":"Acme Holdings"}]"#,
            ),
            (
                STANDALONE_SERVICES_KEY,
                r#"[{"name":"Registered agent","price":"150.50","quantity":2}]"#,
            ),
        ]));

        assert_eq!(snapshot.applications_count(), 1);
        assert_eq!(snapshot.services_count(), 1);

        let lines = snapshot.line_items();
        assert_eq!(lines.len(), 2);

        let (index, app) = &lines[0];
        assert_eq!(*index, 0);
        assert_eq!(app.item_type(), ItemType::Application);
        assert_eq!(app.unit_price(), Decimal::from(599));
        assert_eq!(app.name(), "BVI company formation");

        let (_, service) = &lines[1];
        assert_eq!(service.item_type(), ItemType::Service);
        assert_eq!(service.total_price(), Decimal::new(30100, 2));
    }

    #[test]
    fn missing_fields_mean_no_items() {
        let snapshot = LineItemSnapshot::from_metadata(&metadata(&[("order_id", "ORD1")]));
        assert!(snapshot.line_items().is_empty());
        assert!(snapshot.unparsed_fields().is_empty());
    }

    #[test]
    fn malformed_json_is_kept_as_unparsed() {
        let snapshot =
            LineItemSnapshot::from_metadata(&metadata(&[(APPLICATIONS_KEY, "[{not json")]));

        assert_eq!(snapshot.applications_count(), 0);
        assert!(matches!(
            snapshot.applications,
            ParsedLineItems::Unparsed { ref raw, .. } if raw == "[{not json"
        ));

        let unparsed = snapshot.unparsed_fields();
        assert_eq!(unparsed.len(), 1);
        assert_eq!(unparsed[0].0, APPLICATIONS_KEY);

        let json = snapshot.to_json();
        assert_eq!(json["applications"]["state"], "unparsed");
        assert_eq!(json["standalone_services"]["state"], "parsed");
    }

    #[test]
    fn negative_prices_are_not_trusted() {
        let snapshot = LineItemSnapshot::from_metadata(&metadata(&[(
            STANDALONE_SERVICES_KEY,
            r#"[{"name":"Apostille","price":-10}]"#,
        )]));

        assert_eq!(snapshot.services_count(), 0);
        assert!(snapshot.standalone_services.unparsed_reason().is_some());
    }

    #[test]
    fn unknown_fields_travel_with_the_line() {
        let snapshot = LineItemSnapshot::from_metadata(&metadata(&[(
            APPLICATIONS_KEY,
            r#"[{"jurisdiction_name":"Seychelles","price":799,"package":"premium"}]"#,
        )]));

        let (_, line) = &snapshot.line_items()[0];
        let meta = line.metadata();
        assert_eq!(meta["item_type"], "application");
        assert_eq!(meta["jurisdiction"], "Seychelles");
        assert_eq!(meta["package"], "premium");
    }

    #[test]
    fn counts_saturate_instead_of_wrapping() {
        assert_eq!(count_i32(3), 3);
        assert_eq!(count_i32(usize::MAX), i32::MAX);
    }
}
