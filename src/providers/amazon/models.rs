//! Wire types for PA-API 5.0 `GetItems`.
//!
//! Every response field is optional: the API omits whole sub-trees when a
//! resource is unavailable. Decoding happens once here so the mapper works
//! on a typed shape instead of probing `serde_json::Value`.

use serde::{Deserialize, Serialize};

/// Resources requested for every item.
pub const RESOURCES: &[&str] = &[
    "ItemInfo.Title",
    "Offers.Listings.Price",
    "Offers.Listings.SavingBasis",
    "Offers.Summaries.LowestPrice",
];

/// Only new-condition offers are priced.
pub const CONDITION_NEW: &str = "New";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemsRequest<'a> {
    pub item_ids: &'a [String],
    pub partner_tag: &'a str,
    pub partner_type: &'a str,
    pub marketplace: &'a str,
    pub condition: &'a str,
    pub resources: &'a [&'a str],
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemsResponse {
    pub items_result: Option<ItemsResult>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

impl GetItemsResponse {
    pub fn into_items(self) -> Vec<Item> {
        self.items_result.map(|r| r.items).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemsResult {
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Soft error reported inside a successful response (for example an
/// unknown or unavailable ASIN).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApiError {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Item {
    #[serde(rename = "ASIN")]
    pub asin: String,
    #[serde(rename = "DetailPageURL")]
    pub detail_page_url: Option<String>,
    pub item_info: Option<ItemInfo>,
    pub offers: Option<Offers>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemInfo {
    pub title: Option<DisplayValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayValue {
    pub display_value: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Offers {
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub summaries: Vec<Summary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    pub price: Option<OfferPrice>,
    pub saving_basis: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Summary {
    pub lowest_price: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Money {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub display_amount: Option<String>,
}

/// A listing price, which may carry the provider's own saving figures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OfferPrice {
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub display_amount: Option<String>,
    pub savings: Option<Savings>,
}

impl OfferPrice {
    pub fn as_money(&self) -> Money {
        Money {
            amount: self.amount,
            currency: self.currency.clone(),
            display_amount: self.display_amount.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Savings {
    pub amount: Option<f64>,
    pub percentage: Option<f64>,
    pub display_amount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_uses_pascal_case_fields() {
        let ids = vec!["B001".to_string(), "B002".to_string()];
        let req = GetItemsRequest {
            item_ids: &ids,
            partner_tag: "shop-21",
            partner_type: "Associates",
            marketplace: "www.amazon.de",
            condition: CONDITION_NEW,
            resources: RESOURCES,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["ItemIds"], json!(["B001", "B002"]));
        assert_eq!(v["PartnerTag"], "shop-21");
        assert_eq!(v["Condition"], "New");
        assert_eq!(v["Resources"].as_array().unwrap().len(), RESOURCES.len());
    }

    #[test]
    fn decodes_full_item() {
        let raw = json!({
            "ItemsResult": {
                "Items": [{
                    "ASIN": "B001",
                    "DetailPageURL": "https://www.amazon.de/dp/B001?tag=shop-21",
                    "ItemInfo": { "Title": { "DisplayValue": "Espresso Tamper" } },
                    "Offers": {
                        "Listings": [{
                            "Price": {
                                "Amount": 39.99,
                                "Currency": "EUR",
                                "DisplayAmount": "39,99 €",
                                "Savings": { "Amount": 10.0, "Percentage": 20, "Currency": "EUR" }
                            },
                            "SavingBasis": { "Amount": 49.99, "Currency": "EUR", "DisplayAmount": "49,99 €" }
                        }],
                        "Summaries": [{ "LowestPrice": { "Amount": 37.5, "Currency": "EUR" } }]
                    }
                }]
            }
        });
        let resp: GetItemsResponse = serde_json::from_value(raw).unwrap();
        assert!(resp.errors.is_empty());
        let items = resp.into_items();
        assert_eq!(items.len(), 1);
        let offers = items[0].offers.as_ref().unwrap();
        let price = offers.listings[0].price.as_ref().unwrap();
        assert_eq!(price.amount, Some(39.99));
        assert_eq!(price.savings.as_ref().unwrap().percentage, Some(20.0));
        assert_eq!(offers.summaries[0].lowest_price.as_ref().unwrap().amount, Some(37.5));
    }

    #[test]
    fn missing_items_result_and_errors_decode_to_empty() {
        let resp: GetItemsResponse = serde_json::from_value(json!({
            "Errors": [{ "Code": "ItemNotAccessible", "Message": "The ItemId B00X is not accessible" }]
        }))
        .unwrap();
        assert_eq!(resp.errors.len(), 1);
        assert!(resp.into_items().is_empty());

        let empty: GetItemsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_items().is_empty());
    }
}
