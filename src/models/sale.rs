use chrono::{DateTime as ZonedDateTime, NaiveDate, NaiveDateTime};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Unit price of the sold copies
    pub price: f64,
    pub date_sale: DateTime,
    pub stock_id: i32,
    /// Copies sold in this sale
    pub count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::StockId",
        to = "super::stock::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Stock,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaleFields {
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(deserialize_with = "deserialize_sale_date")]
    pub date_sale: NaiveDateTime,
    #[serde(alias = "id_stock")]
    pub stock_id: i32,
    pub count: i32,
}

impl SaleFields {
    pub fn with_pk(self, pk: i32) -> ActiveModel {
        ActiveModel {
            id: Set(pk),
            price: Set(self.price),
            date_sale: Set(self.date_sale),
            stock_id: Set(self.stock_id),
            count: Set(self.count),
        }
    }
}

/// Parse a sale timestamp.
///
/// Accepts RFC 3339 (`2018-10-25T09:45:24.552Z`, normalised to UTC), naive
/// `YYYY-MM-DD[T ]HH:MM:SS[.fff]` and bare dates (midnight).
pub fn parse_sale_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(zoned) = ZonedDateTime::parse_from_rfc3339(raw) {
        return Some(zoned.naive_utc());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn deserialize_sale_date<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_sale_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date_sale {:?}", raw)))
}

// Fixtures carry prices either as numbers or as strings like "50.05"
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(value) => value,
        RawPrice::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid price {:?}", text)))?,
    };

    if price.is_finite() {
        Ok(price)
    } else {
        Err(de::Error::custom("price must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2018, 10, 25)
            .unwrap()
            .and_hms_milli_opt(9, 45, 24, 552)
            .unwrap();

        assert_eq!(parse_sale_date("2018-10-25T09:45:24.552Z"), Some(expected));
        assert_eq!(parse_sale_date("2018-10-25T09:45:24.552"), Some(expected));
        assert_eq!(parse_sale_date("2018-10-25 09:45:24.552"), Some(expected));
        assert_eq!(
            parse_sale_date("2018-10-25T12:45:24.552+03:00"),
            Some(expected)
        );
        assert_eq!(
            parse_sale_date("2018-10-25"),
            NaiveDate::from_ymd_opt(2018, 10, 25).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_sale_date("yesterday"), None);
    }

    #[test]
    fn test_sale_fields_accept_string_price_and_legacy_names() {
        let fields: SaleFields = serde_json::from_value(serde_json::json!({
            "price": "50.05",
            "date_sale": "2018-10-25T09:45:24.552Z",
            "count": 16,
            "id_stock": 1
        }))
        .expect("legacy sale fields should parse");

        assert_eq!(fields.price, 50.05);
        assert_eq!(fields.stock_id, 1);
        assert_eq!(fields.count, 16);
    }

    #[test]
    fn test_sale_fields_reject_bad_price() {
        let result = serde_json::from_value::<SaleFields>(serde_json::json!({
            "price": "free",
            "date_sale": "2018-10-25",
            "count": 1,
            "stock_id": 1
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<SaleFields>(serde_json::json!({
            "price": "NaN",
            "date_sale": "2018-10-25",
            "count": 1,
            "stock_id": 1
        }));
        assert!(result.is_err());
    }
}
