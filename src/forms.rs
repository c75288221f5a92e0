// src/forms.rs
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::domain::deal::{DealDraft, StatusKind};
use crate::errors::ServerError;

/// Decoded `application/x-www-form-urlencoded` pairs (body or query string).
/// Repeated keys keep the last value.
#[derive(Debug, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    pub fn parse(raw: &[u8]) -> Self {
        Self(
            url::form_urlencoded::parse(raw)
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    pub fn from_query(query: Option<&str>) -> Self {
        query.map(|q| Self::parse(q.as_bytes())).unwrap_or_default()
    }

    /// Trimmed value; blank counts as absent.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>, ServerError> {
        let Some(raw) = self.text(key) else {
            return Ok(None);
        };
        let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | '$' | '%')).collect();
        match cleaned.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(ServerError::BadRequest(format!("{key} must be a number"))),
        }
    }

    /// `YYYY-MM-DD`, as sent by `<input type="date">`.
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, ServerError> {
        self.text(key)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| ServerError::BadRequest(format!("{key} must be a date (YYYY-MM-DD)")))
            })
            .transpose()
    }
}

/// Builds a draft from the add/edit deal form. Missing rate, share and
/// status take the form defaults.
pub fn parse_deal_form(fields: &FormFields) -> Result<DealDraft, ServerError> {
    let defaults = DealDraft::default();

    let address = fields
        .text("address")
        .ok_or_else(|| ServerError::BadRequest("address is required".into()))?
        .to_string();

    let listing_price = fields
        .number("listing_price")?
        .ok_or_else(|| ServerError::BadRequest("listing_price is required".into()))?;
    if listing_price < 0.0 {
        return Err(ServerError::BadRequest(
            "listing_price cannot be negative".into(),
        ));
    }

    let status = match fields.text("status") {
        Some(raw) => StatusKind::parse(raw)
            .ok_or_else(|| ServerError::BadRequest(format!("unknown status {raw:?}")))?,
        None => defaults.status,
    };

    Ok(DealDraft {
        address,
        listing_price,
        commission_rate: fields
            .number("commission_rate")?
            .unwrap_or(defaults.commission_rate),
        my_share: fields.number("my_share")?.unwrap_or(defaults.my_share),
        status,
        estimated_close_date: fields.date("estimated_close_date")?,
        actual_close_date: fields.date("actual_close_date")?,
        paid_date: fields.date("paid_date")?,
        notes: fields.text("notes").map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_form_parses() {
        let fields = FormFields::parse(
            b"address=12+Crest+Rd&listing_price=400%2C000&commission_rate=3&my_share=50\
              &status=under-contract&estimated_close_date=2025-03-15&actual_close_date=&notes=+",
        );
        let draft = parse_deal_form(&fields).unwrap();

        assert_eq!(draft.address, "12 Crest Rd");
        assert_eq!(draft.listing_price, 400_000.0);
        assert_eq!(draft.my_share, 50.0);
        assert_eq!(draft.status, StatusKind::UnderContract);
        assert_eq!(draft.estimated_close_date, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(draft.actual_close_date, None);
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn missing_optional_numbers_use_defaults() {
        let fields = FormFields::parse(b"address=1+A+St&listing_price=100");
        let draft = parse_deal_form(&fields).unwrap();
        assert_eq!(draft.commission_rate, 3.0);
        assert_eq!(draft.my_share, 40.0);
        assert_eq!(draft.status, StatusKind::Listed);
    }

    #[test]
    fn rejects_bad_input() {
        for body in [
            &b"listing_price=100"[..],
            b"address=+&listing_price=100",
            b"address=x&listing_price=-5",
            b"address=x&listing_price=abc",
            b"address=x&listing_price=1&status=pending",
            b"address=x&listing_price=1&paid_date=03/01/2025",
        ] {
            match parse_deal_form(&FormFields::parse(body)) {
                Err(ServerError::BadRequest(_)) => {}
                other => panic!("expected BadRequest for {:?}, got {:?}", body, other),
            }
        }
    }

    #[test]
    fn query_string_lookup() {
        let q = FormFields::from_query(Some("token=abc-123&x=1"));
        assert_eq!(q.text("token"), Some("abc-123"));
        assert_eq!(FormFields::from_query(None).text("token"), None);
    }
}
