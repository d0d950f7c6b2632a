//! AWS Signature Version 4 signing for PA-API 5.0 `GetItems` calls.
//!
//! The canonical request covers a fixed header set in a fixed order:
//!
//! ```text
//! POST
//! /paapi5/getitems
//!
//! content-encoding:amz-1.0
//! content-type:application/json; charset=utf-8
//! host:<host>
//! x-amz-date:<YYYYMMDDTHHMMSSZ>
//! x-amz-target:com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems
//!
//! content-encoding;content-type;host;x-amz-date;x-amz-target
//! <hex sha256 of body>
//! ```
//!
//! The signing key is `HMAC("AWS4" + secret, date)` chained through region,
//! service and `aws4_request`. Any deviation in header order, casing or
//! newlines makes every call fail with a signature mismatch.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::config::{AppConfig, Credentials};

type HmacSha256 = Hmac<Sha256>;

pub const SERVICE: &str = "ProductAdvertisingAPI";
pub const GET_ITEMS_PATH: &str = "/paapi5/getitems";
pub const GET_ITEMS_TARGET: &str = "com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems";

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const TERMINATOR: &str = "aws4_request";
const KEY_PREFIX: &str = "AWS4";
const METHOD: &str = "POST";
const CONTENT_ENCODING: &str = "amz-1.0";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const SIGNED_HEADERS: &str = "content-encoding;content-type;host;x-amz-date;x-amz-target";

const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_STAMP_FORMAT: &str = "%Y%m%d";

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn sha256_hex(input: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input);
    to_hex(&hasher.finalize())
}

fn hmac_sha256(key: &[u8], data: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Headers to attach to one signed request, lower-cased names, signed ones
/// first and `authorization` last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub headers: Vec<(&'static str, String)>,
}

impl SignedHeaders {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Stateless signer bound to one credential set, region and host.
#[derive(Debug, Clone)]
pub struct PaapiSigner {
    credentials: Credentials,
    region: String,
    host: String,
}

impl PaapiSigner {
    pub fn new(credentials: Credentials, region: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
            host: host.into(),
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.credentials.clone(), &cfg.region, &cfg.host)
    }

    /// The signed header block, in canonical order.
    fn canonical_headers(&self, amz_date: &str) -> [(&'static str, String); 5] {
        [
            ("content-encoding", CONTENT_ENCODING.to_string()),
            ("content-type", CONTENT_TYPE.to_string()),
            ("host", self.host.clone()),
            ("x-amz-date", amz_date.to_string()),
            ("x-amz-target", GET_ITEMS_TARGET.to_string()),
        ]
    }

    pub fn canonical_request(&self, body: &str, amz_date: &str) -> String {
        let mut headers = String::new();
        for (name, value) in self.canonical_headers(amz_date) {
            let _ = writeln!(&mut headers, "{name}:{value}");
        }
        format!(
            "{METHOD}\n{GET_ITEMS_PATH}\n\n{headers}\n{SIGNED_HEADERS}\n{}",
            sha256_hex(body.as_bytes())
        )
    }

    pub fn credential_scope(&self, date_stamp: &str) -> String {
        format!("{date_stamp}/{}/{SERVICE}/{TERMINATOR}", self.region)
    }

    pub fn string_to_sign(&self, amz_date: &str, scope: &str, canonical_request: &str) -> String {
        format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        )
    }

    fn signing_key(&self, date_stamp: &str) -> Vec<u8> {
        let seed = format!("{KEY_PREFIX}{}", self.credentials.secret_key);
        let k_date = hmac_sha256(seed.as_bytes(), date_stamp);
        let k_region = hmac_sha256(&k_date, &self.region);
        let k_service = hmac_sha256(&k_region, SERVICE);
        hmac_sha256(&k_service, TERMINATOR)
    }

    /// `Authorization` header value for `body` sent at `timestamp`.
    pub fn authorization(&self, body: &str, timestamp: DateTime<Utc>) -> String {
        let amz_date = timestamp.format(AMZ_DATE_FORMAT).to_string();
        let date_stamp = timestamp.format(DATE_STAMP_FORMAT).to_string();

        let canonical_request = self.canonical_request(body, &amz_date);
        let scope = self.credential_scope(&date_stamp);
        let string_to_sign = self.string_to_sign(&amz_date, &scope, &canonical_request);
        let signature = to_hex(&hmac_sha256(&self.signing_key(&date_stamp), &string_to_sign));

        format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.credentials.access_key
        )
    }

    /// Every header the request must carry, including `authorization`.
    pub fn sign(&self, body: &str, timestamp: DateTime<Utc>) -> SignedHeaders {
        let amz_date = timestamp.format(AMZ_DATE_FORMAT).to_string();
        let mut headers: Vec<(&'static str, String)> =
            self.canonical_headers(&amz_date).into_iter().collect();
        headers.push(("authorization", self.authorization(body, timestamp)));
        SignedHeaders { headers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BODY: &str = r#"{"ItemIds":["B000TEST01"],"PartnerTag":"shop-21"}"#;

    fn signer() -> PaapiSigner {
        PaapiSigner::new(
            Credentials {
                access_key: "AKIDEXAMPLE".into(),
                secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".into(),
            },
            "eu-west-1",
            "webservices.amazon.de",
        )
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
    }

    #[test]
    fn canonical_request_layout() {
        let cr = signer().canonical_request(BODY, "20240115T083000Z");
        let expected = "POST\n/paapi5/getitems\n\n\
            content-encoding:amz-1.0\n\
            content-type:application/json; charset=utf-8\n\
            host:webservices.amazon.de\n\
            x-amz-date:20240115T083000Z\n\
            x-amz-target:com.amazon.paapi5.v1.ProductAdvertisingAPIv1.GetItems\n\
            \n\
            content-encoding;content-type;host;x-amz-date;x-amz-target\n\
            fcb344893a53d3c5297cd4f649de164f66db1e8dddd403866e4890cb70603c87";
        assert_eq!(cr, expected);
    }

    #[test]
    fn known_answer_authorization() {
        let auth = signer().authorization(BODY, ts());
        assert_eq!(
            auth,
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240115/eu-west-1/ProductAdvertisingAPI/aws4_request, \
             SignedHeaders=content-encoding;content-type;host;x-amz-date;x-amz-target, \
             Signature=fcb84bc36305be75aad16bb9bf6c74a488697c5f245d4dcdbdf85d1d9933e885"
        );
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let s = signer();
        assert_eq!(s.authorization(BODY, ts()), s.authorization(BODY, ts()));
        assert_eq!(s.sign(BODY, ts()), s.sign(BODY, ts()));
    }

    #[test]
    fn single_body_byte_changes_signature() {
        let s = signer();
        let mut altered = BODY.as_bytes().to_vec();
        altered[12] ^= 0x01;
        let altered = String::from_utf8(altered).unwrap();
        assert_ne!(s.authorization(BODY, ts()), s.authorization(&altered, ts()));
    }

    #[test]
    fn timestamp_changes_signature() {
        let s = signer();
        let later = Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 1).unwrap();
        assert_ne!(s.authorization(BODY, ts()), s.authorization(BODY, later));
    }

    #[test]
    fn sign_emits_headers_in_order_with_authorization_last() {
        let signed = signer().sign(BODY, ts());
        let names: Vec<&str> = signed.headers.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "content-encoding",
                "content-type",
                "host",
                "x-amz-date",
                "x-amz-target",
                "authorization"
            ]
        );
        assert_eq!(signed.get("x-amz-date"), Some("20240115T083000Z"));
        assert!(signed
            .get("authorization")
            .unwrap()
            .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240115/"));
    }
}
