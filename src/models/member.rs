//! Library member model

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Member record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub member_id: i32,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Birth date (YYYY-MM-DD)
    pub birth_date: NaiveDate,
    pub address: String,
}

/// Create member request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number must not be empty"))]
    pub phone_number: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp
    #[serde(deserialize_with = "date_or_timestamp")]
    pub birth_date: NaiveDate,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,
}

/// Read a calendar date, keeping only the date part of a full timestamp
fn date_or_timestamp<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| serde::de::Error::custom(format!("invalid date `{}`", raw)))
}

/// Update member request. Every field is replaced.
pub type UpdateMember = CreateMember;

impl Member {
    /// Build a member record from request fields and an assigned id
    pub fn from_fields(member_id: i32, data: &CreateMember) -> Self {
        Self {
            member_id,
            name: data.name.clone(),
            email: data.email.clone(),
            phone_number: data.phone_number.clone(),
            birth_date: data.birth_date,
            address: data.address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(birth_date: &str) -> serde_json::Value {
        serde_json::json!({
            "name": "Alice",
            "email": "alice@example.org",
            "phoneNumber": "555-0100",
            "birthDate": birth_date,
            "address": "1 Main St"
        })
    }

    #[test]
    fn birth_date_accepts_plain_date() {
        let member: CreateMember = serde_json::from_value(request("1990-05-17")).unwrap();
        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());
    }

    #[test]
    fn birth_date_accepts_browser_timestamp() {
        let member: CreateMember =
            serde_json::from_value(request("1990-05-17T00:00:00.000Z")).unwrap();
        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());

        let member: CreateMember =
            serde_json::from_value(request("1990-05-17T09:30:00+02:00")).unwrap();
        assert_eq!(member.birth_date, NaiveDate::from_ymd_opt(1990, 5, 17).unwrap());
    }

    #[test]
    fn birth_date_rejects_garbage() {
        let err = serde_json::from_value::<CreateMember>(request("last tuesday")).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }
}
