use crate::enums::{RecordField, StatusGroup};
use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line item of the pre-joined order dataset.
///
/// An order with several items appears once per item, so `order_id` is not unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub order_date: NaiveDateTime,
    #[serde(default)]
    pub order_delivered_customer_date: Option<NaiveDateTime>,
    pub product_category_name: String,
    pub quantity: u64,
    pub total_price: Decimal,
    pub customer_state: String,
    /// Raw status label. Resolved with [`OrderRecord::status`].
    pub status_group: String,
}

impl OrderRecord {
    /// The calendar day the order was placed.
    pub fn order_day(&self) -> NaiveDate {
        self.order_date.date()
    }

    /// Resolves the raw status label into a `StatusGroup`.
    pub fn status(&self) -> Result<StatusGroup, CoreError> {
        self.status_group.parse()
    }

    /// Checks a single field for missing or malformed values.
    pub fn check(&self, field: RecordField) -> Result<(), CoreError> {
        match field {
            RecordField::OrderId => require_text(field, &self.order_id),
            RecordField::CustomerId => require_text(field, &self.customer_id),
            RecordField::ProductCategoryName => require_text(field, &self.product_category_name),
            RecordField::CustomerState => require_text(field, &self.customer_state),
            RecordField::StatusGroup => {
                require_text(field, &self.status_group)?;
                self.status().map(|_| ())
            }
            RecordField::TotalPrice => {
                if self.total_price.is_sign_negative() && !self.total_price.is_zero() {
                    return Err(CoreError::InvalidValue(
                        field,
                        format!("price must be non-negative, got {}", self.total_price),
                    ));
                }
                Ok(())
            }
            RecordField::OrderDeliveredCustomerDate => match self.order_delivered_customer_date {
                Some(delivered) if delivered < self.order_date => Err(CoreError::InvalidValue(
                    field,
                    format!("delivered at {} before ordered at {}", delivered, self.order_date),
                )),
                _ => Ok(()),
            },
            // Typed as a timestamp and an unsigned integer; nothing left to check.
            RecordField::OrderDate | RecordField::Quantity => Ok(()),
        }
    }

    /// Checks every field of the record.
    pub fn validate(&self) -> Result<(), CoreError> {
        const ALL_FIELDS: [RecordField; 9] = [
            RecordField::OrderId,
            RecordField::CustomerId,
            RecordField::OrderDate,
            RecordField::OrderDeliveredCustomerDate,
            RecordField::ProductCategoryName,
            RecordField::Quantity,
            RecordField::TotalPrice,
            RecordField::CustomerState,
            RecordField::StatusGroup,
        ];
        ALL_FIELDS.into_iter().try_for_each(|field| self.check(field))
    }
}

fn require_text(field: RecordField, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        Err(CoreError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> OrderRecord {
        OrderRecord {
            order_id: "o-1".to_string(),
            customer_id: "c-1".to_string(),
            order_date: NaiveDate::from_ymd_opt(2018, 3, 14)
                .unwrap()
                .and_hms_opt(21, 5, 0)
                .unwrap(),
            order_delivered_customer_date: None,
            product_category_name: "bed_bath_table".to_string(),
            quantity: 2,
            total_price: dec!(129.90),
            customer_state: "SP".to_string(),
            status_group: "Completed".to_string(),
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(record().validate().is_ok());
        assert_eq!(record().order_day(), NaiveDate::from_ymd_opt(2018, 3, 14).unwrap());
        assert_eq!(record().status(), Ok(StatusGroup::Completed));
    }

    #[test]
    fn blank_identifiers_are_missing() {
        let mut r = record();
        r.customer_id = "   ".to_string();
        assert_eq!(
            r.validate(),
            Err(CoreError::MissingField(RecordField::CustomerId))
        );
        assert!(r.check(RecordField::OrderId).is_ok());
    }

    #[test]
    fn negative_price_is_invalid() {
        let mut r = record();
        r.total_price = dec!(-1.00);
        let err = r.check(RecordField::TotalPrice).unwrap_err();
        assert_eq!(err.field(), RecordField::TotalPrice);

        r.total_price = dec!(0);
        assert!(r.check(RecordField::TotalPrice).is_ok());
    }

    #[test]
    fn delivery_before_order_is_invalid() {
        let mut r = record();
        r.order_delivered_customer_date = Some(r.order_date - chrono::Duration::days(1));
        assert!(r.check(RecordField::OrderDeliveredCustomerDate).is_err());

        r.order_delivered_customer_date = Some(r.order_date + chrono::Duration::days(6));
        assert!(r.validate().is_ok());
    }

    #[test]
    fn unknown_status_fails_status_check() {
        let mut r = record();
        r.status_group = "shipped".to_string();
        assert_eq!(
            r.check(RecordField::StatusGroup),
            Err(CoreError::UnknownStatusGroup("shipped".to_string()))
        );
    }

    #[test]
    fn deserializes_from_json_without_delivery_date() {
        let json = r#"{
            "order_id": "o-9",
            "customer_id": "c-9",
            "order_date": "2017-11-24T10:00:00",
            "product_category_name": "toys",
            "quantity": 1,
            "total_price": "59.90",
            "customer_state": "RJ",
            "status_group": "New"
        }"#;
        let r: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.order_delivered_customer_date, None);
        assert_eq!(r.total_price, dec!(59.90));
        assert_eq!(r.status(), Ok(StatusGroup::New));
    }
}
