use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::resource::{string_or_number, Resource, Toggleable};
use crate::status::{ActiveStatus, CouponStatus};
use crate::validation::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

/// A discount code managed under `/api/coupons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub max_discount_amount: Decimal,
    #[serde(default)]
    pub usage_limit: i64,
    #[serde(default)]
    pub usage_count: i64,
    #[serde(with = "form_datetime")]
    pub start_date: NaiveDateTime,
    #[serde(with = "form_datetime")]
    pub end_date: NaiveDateTime,
    #[serde(default)]
    pub status: CouponStatus,
}

impl Coupon {
    /// Short human summary, e.g. `"10% off • Min. order: $100"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = match self.discount_type {
            DiscountType::Percentage => format!("{}% off", self.discount_value.normalize()),
            DiscountType::Fixed => format!("${} off", self.discount_value.normalize()),
        };
        if self.min_order_amount > Decimal::ZERO {
            out.push_str(&format!(
                " \u{2022} Min. order: ${}",
                self.min_order_amount.normalize()
            ));
        }
        if self.max_discount_amount > Decimal::ZERO {
            out.push_str(&format!(
                " \u{2022} Max. discount: ${}",
                self.max_discount_amount.normalize()
            ));
        }
        out
    }
}

impl Resource for Coupon {
    const LABEL: &'static str = "Coupon";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Toggleable for Coupon {
    fn active_status(&self) -> Option<ActiveStatus> {
        self.status.as_active()
    }

    fn set_active_status(&mut self, status: ActiveStatus) {
        self.status = status.into();
    }

    fn frozen_message(&self) -> String {
        "Cannot change the status of an expired coupon".to_string()
    }
}

/// Form state for creating or updating a coupon. Serialized as the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponDraft {
    pub code: String,
    pub discount_type: DiscountType,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_order_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_discount_amount: Decimal,
    pub usage_limit: i64,
    #[serde(serialize_with = "form_datetime::serialize_option")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(serialize_with = "form_datetime::serialize_option")]
    pub end_date: Option<NaiveDateTime>,
}

impl CouponDraft {
    #[must_use]
    pub fn from_coupon(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            discount_type: coupon.discount_type,
            discount_value: coupon.discount_value,
            min_order_amount: coupon.min_order_amount,
            max_discount_amount: coupon.max_discount_amount,
            usage_limit: coupon.usage_limit,
            start_date: Some(coupon.start_date),
            end_date: Some(coupon.end_date),
        }
    }

    /// # Errors
    ///
    /// Returns every violated rule. Required fields are checked first; the
    /// percentage cap only applies to percentage coupons.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            self.code.trim().is_empty() || self.start_date.is_none() || self.end_date.is_none(),
            "Please fill in all required fields",
        );
        errors.check(
            self.discount_value <= Decimal::ZERO,
            "Discount value must be greater than 0",
        );
        errors.check(
            self.discount_type == DiscountType::Percentage
                && self.discount_value > Decimal::ONE_HUNDRED,
            "Percentage discount cannot be greater than 100%",
        );
        errors.check(
            self.min_order_amount < Decimal::ZERO,
            "Minimum order amount cannot be negative",
        );
        errors.check(
            self.max_discount_amount < Decimal::ZERO,
            "Maximum discount amount cannot be negative",
        );
        errors.check(self.usage_limit < 0, "Usage limit cannot be negative");
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            errors.check(end < start, "End date cannot be before start date");
        }
        errors.into_result()
    }
}

/// Dates as the `datetime-local` input produces them (`2024-03-15T10:30`),
/// also accepting full RFC 3339 timestamps from the server.
pub mod form_datetime {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M";

    /// Parses the accepted date formats.
    ///
    /// # Errors
    ///
    /// Returns the last parse error when no format matches.
    pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, FORMAT))
    }

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    #[allow(clippy::ref_option)]
    pub fn serialize_option<S>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serialize(v, serializer),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn date(raw: &str) -> NaiveDateTime {
        form_datetime::parse(raw).unwrap()
    }

    fn draft(discount_type: DiscountType, value: i64) -> CouponDraft {
        CouponDraft {
            code: "WELCOME10".to_string(),
            discount_type,
            discount_value: Decimal::from(value),
            min_order_amount: Decimal::from(100),
            max_discount_amount: Decimal::from(50),
            usage_limit: 100,
            start_date: Some(date("2024-03-01T00:00")),
            end_date: Some(date("2024-04-01T00:00")),
        }
    }

    #[test]
    fn percentage_over_one_hundred_is_rejected() {
        let err = draft(DiscountType::Percentage, 150).validate().unwrap_err();
        assert_eq!(
            err.messages(),
            ["Percentage discount cannot be greater than 100%"]
        );
    }

    #[test]
    fn percentage_of_fifty_is_accepted() {
        assert!(draft(DiscountType::Percentage, 50).validate().is_ok());
    }

    #[test]
    fn fixed_discount_over_one_hundred_is_accepted() {
        assert!(draft(DiscountType::Fixed, 150).validate().is_ok());
    }

    #[test]
    fn zero_discount_is_rejected() {
        let err = draft(DiscountType::Fixed, 0).validate().unwrap_err();
        assert!(err.contains("Discount value must be greater than 0"));
    }

    #[test]
    fn negative_amounts_and_limits_are_rejected() {
        let mut d = draft(DiscountType::Fixed, 5);
        d.min_order_amount = Decimal::from(-1);
        d.max_discount_amount = Decimal::from(-1);
        d.usage_limit = -1;
        let err = d.validate().unwrap_err();
        assert_eq!(err.messages().len(), 3);
    }

    #[test]
    fn missing_dates_are_required_fields() {
        let mut d = draft(DiscountType::Fixed, 5);
        d.end_date = None;
        let err = d.validate().unwrap_err();
        assert!(err.contains("Please fill in all required fields"));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut d = draft(DiscountType::Fixed, 5);
        d.end_date = Some(date("2024-02-01T00:00"));
        let err = d.validate().unwrap_err();
        assert!(err.contains("End date cannot be before start date"));
    }

    #[test]
    fn coupon_parses_server_timestamps_and_numeric_id() {
        let coupon: Coupon = serde_json::from_value(json!({
            "_id": 42,
            "code": "SPRING",
            "discountType": "fixed",
            "discountValue": 20,
            "minOrderAmount": 100,
            "maxDiscountAmount": 0,
            "usageLimit": 10,
            "usageCount": 3,
            "startDate": "2024-03-01T00:00:00.000Z",
            "endDate": "2024-04-01T10:30",
            "status": "expired"
        }))
        .unwrap();
        assert_eq!(coupon.id, "42");
        assert_eq!(coupon.status, CouponStatus::Expired);
        assert_eq!(coupon.active_status(), None);
        assert_eq!(coupon.start_date, date("2024-03-01T00:00"));
        assert_eq!(coupon.summary(), "$20 off \u{2022} Min. order: $100");
    }

    #[test]
    fn draft_serializes_form_dates_and_numbers() {
        let body = serde_json::to_value(draft(DiscountType::Percentage, 10)).unwrap();
        assert_eq!(body["discountType"], "percentage");
        assert_eq!(body["discountValue"], json!(10.0));
        assert_eq!(body["startDate"], "2024-03-01T00:00");
    }
}
