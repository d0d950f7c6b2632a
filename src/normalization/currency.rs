/// Number/currency layout for one storefront locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub decimal: char,
    pub group: char,
    pub symbol_first: bool,
    /// Separator between amount and symbol, if any.
    pub symbol_gap: Option<char>,
}

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

const CONTINENTAL: NumberStyle = NumberStyle {
    decimal: ',',
    group: '.',
    symbol_first: false,
    symbol_gap: Some(NBSP),
};

const FRENCH: NumberStyle = NumberStyle {
    decimal: ',',
    group: NARROW_NBSP,
    symbol_first: false,
    symbol_gap: Some(NBSP),
};

const DUTCH: NumberStyle = NumberStyle {
    decimal: ',',
    group: '.',
    symbol_first: true,
    symbol_gap: Some(NBSP),
};

const ENGLISH: NumberStyle = NumberStyle {
    decimal: '.',
    group: ',',
    symbol_first: true,
    symbol_gap: None,
};

/// Formatting rules plus the fallback currency for a marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketLocale {
    pub style: NumberStyle,
    pub default_currency: &'static str,
}

impl MarketLocale {
    /// Pick the locale from a marketplace host such as `www.amazon.de`.
    /// Unknown marketplaces fall back to German formatting in EUR.
    pub fn for_marketplace(marketplace: &str) -> Self {
        let host = marketplace.trim().to_ascii_lowercase();
        let (style, default_currency) = if host.ends_with(".co.uk") {
            (ENGLISH, "GBP")
        } else if host.ends_with(".com") {
            (ENGLISH, "USD")
        } else if host.ends_with(".fr") {
            (FRENCH, "EUR")
        } else if host.ends_with(".nl") {
            (DUTCH, "EUR")
        } else {
            // .de, .it, .es and anything unrecognised
            (CONTINENTAL, "EUR")
        };
        Self {
            style,
            default_currency,
        }
    }
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "GBP" => "£",
        "USD" => "$",
        "PLN" => "zł",
        "SEK" => "kr",
        _ => code,
    }
}

fn is_iso_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn group_digits(digits: &str, sep: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Locale-aware currency rendering with two decimals.
///
/// Returns `None` when the amount is not finite or the currency is not a
/// three-letter ISO code; callers fall back to a plain rendering.
pub fn format_currency(amount: f64, currency: &str, locale: &MarketLocale) -> Option<String> {
    if !amount.is_finite() || !is_iso_code(currency) {
        return None;
    }
    let style = locale.style;
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.')?;
    let number = format!(
        "{}{}{}",
        group_digits(int_part, style.group),
        style.decimal,
        frac_part
    );
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    let symbol = currency_symbol(currency);
    let gap = style.symbol_gap.map(String::from).unwrap_or_default();

    Some(if style.symbol_first {
        format!("{sign}{symbol}{gap}{number}")
    } else {
        format!("{sign}{number}{gap}{symbol}")
    })
}

/// Plain rendering used when locale formatting is unavailable.
pub fn format_plain(amount: f64, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}
