use serde::Serialize;

use super::currency::{format_currency, format_plain, MarketLocale};
use crate::providers::amazon::models::{Item, Listing, Money, OfferPrice};

/// Normalized price entry for one storefront product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub asin: String,
    pub currency: String,
    pub display_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_display_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u32>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn has_value(money: &Money) -> bool {
    money.amount.is_some_and(f64::is_finite) || non_blank(money.display_amount.as_deref()).is_some()
}

fn positive_percent(value: f64) -> Option<u32> {
    let rounded = value.round();
    (rounded.is_finite() && rounded > 0.0).then_some(rounded as u32)
}

/// Turns decoded `GetItems` items into [`PriceRecord`]s.
#[derive(Debug, Clone, Copy)]
pub struct PriceMapper {
    locale: MarketLocale,
}

impl PriceMapper {
    pub fn new(locale: MarketLocale) -> Self {
        Self { locale }
    }

    pub fn for_marketplace(marketplace: &str) -> Self {
        Self::new(MarketLocale::for_marketplace(marketplace))
    }

    /// Provider display string when present, else a locale rendering of the
    /// amount, else `"<amount> <CODE>"`.
    fn display_for(&self, money: &Money, currency: &str) -> Option<String> {
        if let Some(shown) = non_blank(money.display_amount.as_deref()) {
            return Some(shown.to_string());
        }
        let amount = money.amount.filter(|a| a.is_finite())?;
        Some(
            format_currency(amount, currency, &self.locale)
                .unwrap_or_else(|| format_plain(amount, currency)),
        )
    }

    /// Listing price first, lowest summary price second.
    fn pick_price<'i>(&self, item: &'i Item) -> Option<(Money, Option<&'i Listing>)> {
        let offers = item.offers.as_ref()?;
        let listing = offers.listings.first();
        if let Some(price) = listing
            .and_then(|l| l.price.as_ref())
            .map(OfferPrice::as_money)
            .filter(has_value)
        {
            return Some((price, listing));
        }
        offers
            .summaries
            .first()
            .and_then(|s| s.lowest_price.clone())
            .filter(has_value)
            .map(|price| (price, listing))
    }

    /// `None` when the item carries no usable price.
    pub fn map(&self, item: &Item) -> Option<PriceRecord> {
        let (price, listing) = self.pick_price(item)?;

        let currency = non_blank(price.currency.as_deref())
            .unwrap_or(self.locale.default_currency)
            .to_string();
        let display_price = self.display_for(&price, &currency)?;
        let amount = price.amount.filter(|a| a.is_finite()).map(round2);

        let basis = listing.and_then(|l| l.saving_basis.as_ref());
        let list_price = basis
            .and_then(|b| b.amount)
            .filter(|a| a.is_finite())
            .map(round2);
        let list_display_price = basis.and_then(|b| {
            let code = non_blank(b.currency.as_deref()).unwrap_or(&currency);
            self.display_for(b, code)
        });

        let savings = listing
            .and_then(|l| l.price.as_ref())
            .and_then(|p| p.savings.as_ref());
        let provided = savings
            .and_then(|s| s.amount)
            .filter(|a| a.is_finite() && *a > 0.0);

        let (discount_amount, discount_percent) = match (provided, amount, list_price) {
            (Some(saved), _, list) => {
                let percent = savings
                    .and_then(|s| s.percentage)
                    .and_then(positive_percent)
                    .or_else(|| {
                        list.filter(|l| *l > 0.0)
                            .and_then(|l| positive_percent(100.0 * saved / l))
                    });
                (Some(round2(saved)), percent)
            }
            (None, Some(current), Some(list)) if list > current => {
                let saved = round2(list - current);
                (Some(saved), positive_percent(100.0 * saved / list))
            }
            _ => (None, None),
        };

        Some(PriceRecord {
            asin: item.asin.clone(),
            currency,
            display_price,
            price: amount,
            list_price,
            list_display_price,
            discount_amount: discount_amount.filter(|a| *a > 0.0),
            discount_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::amazon::models::{Offers, Savings, Summary};

    fn money(amount: Option<f64>, display: Option<&str>) -> Money {
        Money {
            amount,
            currency: Some("EUR".into()),
            display_amount: display.map(String::from),
        }
    }

    fn item_with(listing: Option<Listing>, summary: Option<Summary>) -> Item {
        Item {
            asin: "B0TEST0001".into(),
            offers: Some(Offers {
                listings: listing.into_iter().collect(),
                summaries: summary.into_iter().collect(),
            }),
            ..Default::default()
        }
    }

    fn listing(price: Option<f64>, basis: Option<f64>) -> Listing {
        Listing {
            price: Some(OfferPrice {
                amount: price,
                currency: Some("EUR".into()),
                display_amount: None,
                savings: None,
            }),
            saving_basis: basis.map(|b| money(Some(b), None)),
        }
    }

    fn mapper() -> PriceMapper {
        PriceMapper::for_marketplace("www.amazon.de")
    }

    #[test]
    fn derives_discount_from_saving_basis() {
        let rec = mapper()
            .map(&item_with(Some(listing(Some(100.0), Some(120.0))), None))
            .unwrap();
        assert_eq!(rec.price, Some(100.0));
        assert_eq!(rec.list_price, Some(120.0));
        assert_eq!(rec.discount_amount, Some(20.0));
        assert_eq!(rec.discount_percent, Some(17));
        assert_eq!(rec.display_price, "100,00\u{a0}€");
        assert_eq!(rec.list_display_price.as_deref(), Some("120,00\u{a0}€"));
    }

    #[test]
    fn provider_savings_win_over_derivation() {
        let mut l = listing(Some(79.0), Some(99.0));
        if let Some(p) = l.price.as_mut() {
            p.display_amount = Some("79,00 €".into());
            p.savings = Some(Savings {
                amount: Some(20.0),
                percentage: Some(20.0),
                display_amount: None,
            });
        }
        let rec = mapper().map(&item_with(Some(l), None)).unwrap();
        assert_eq!(rec.display_price, "79,00 €");
        assert_eq!(rec.discount_amount, Some(20.0));
        assert_eq!(rec.discount_percent, Some(20));
    }

    #[test]
    fn provider_amount_without_percentage_uses_list_price() {
        let mut l = listing(Some(75.0), Some(100.0));
        if let Some(p) = l.price.as_mut() {
            p.savings = Some(Savings {
                amount: Some(25.0),
                percentage: None,
                display_amount: None,
            });
        }
        let rec = mapper().map(&item_with(Some(l), None)).unwrap();
        assert_eq!(rec.discount_amount, Some(25.0));
        assert_eq!(rec.discount_percent, Some(25));
    }

    #[test]
    fn no_discount_when_list_not_above_price() {
        let rec = mapper()
            .map(&item_with(Some(listing(Some(50.0), Some(50.0))), None))
            .unwrap();
        assert_eq!(rec.discount_amount, None);
        assert_eq!(rec.discount_percent, None);

        let json = serde_json::to_value(&rec).unwrap();
        assert!(json.get("discountAmount").is_none());
        assert!(json.get("discountPercent").is_none());
        assert_eq!(json["listPrice"], 50.0);
    }

    #[test]
    fn falls_back_to_lowest_summary_price() {
        let summary = Summary {
            lowest_price: Some(money(Some(12.346), None)),
        };
        let rec = mapper().map(&item_with(None, Some(summary))).unwrap();
        assert_eq!(rec.price, Some(12.35));
        assert_eq!(rec.display_price, "12,35\u{a0}€");
        assert_eq!(rec.list_price, None);
        assert_eq!(rec.discount_amount, None);
    }

    #[test]
    fn blank_display_is_replaced_by_formatting() {
        let summary = Summary {
            lowest_price: Some(money(Some(3.5), Some("   "))),
        };
        let rec = mapper().map(&item_with(None, Some(summary))).unwrap();
        assert_eq!(rec.display_price, "3,50\u{a0}€");
    }

    #[test]
    fn invalid_currency_uses_plain_rendering() {
        let summary = Summary {
            lowest_price: Some(Money {
                amount: Some(7.0),
                currency: Some("euro".into()),
                display_amount: None,
            }),
        };
        let rec = mapper().map(&item_with(None, Some(summary))).unwrap();
        assert_eq!(rec.currency, "euro");
        assert_eq!(rec.display_price, "7.00 euro");
    }

    #[test]
    fn missing_currency_defaults_to_marketplace() {
        let summary = Summary {
            lowest_price: Some(Money {
                amount: Some(7.0),
                currency: None,
                display_amount: None,
            }),
        };
        let rec = mapper().map(&item_with(None, Some(summary))).unwrap();
        assert_eq!(rec.currency, "EUR");
    }

    #[test]
    fn discards_items_without_price() {
        let m = mapper();
        assert_eq!(m.map(&item_with(None, None)), None);
        assert_eq!(m.map(&Item { asin: "B0X".into(), ..Default::default() }), None);
        assert_eq!(m.map(&item_with(Some(listing(None, Some(10.0))), None)), None);
    }
}
