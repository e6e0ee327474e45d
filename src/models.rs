use serde::{Serialize, Deserialize};
use serde_json::Value;
use std::convert::TryFrom;
use std::str::FromStr;
use crate::error::RequestError;
use crate::schema::ratings;

// database

#[derive(Queryable, Serialize, Debug)]
pub struct Rating {
    #[serde(skip_serializing)]
    pub id: i64,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub who: Option<String>,
    pub url: Option<String>,
    pub mark: Option<i32>,
    pub cats: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
}

#[derive(Insertable, Debug, PartialEq)]
#[diesel(table_name = ratings)]
pub struct NewRating {
    pub secret: String,
    pub who: String,
    pub url: String,
    pub mark: i32,
    pub cats: String,
    pub description: Option<String>,
}

// requests

/// Body of a POST. Fields are optional here so that a missing one is
/// reported by name instead of as a generic deserialization failure.
#[derive(Deserialize, Debug, Default)]
pub struct RatingPayload {
    pub who: Option<String>,
    pub url: Option<String>,
    pub mark: Option<Value>,
    pub cats: Option<String>,
    pub desc: Option<String>,
}

impl RatingPayload {
    pub fn validate(self, secret: &str) -> Result<NewRating, RequestError> {
        if !is_valid_secret(secret) {
            return Err(RequestError::InvalidSecret(secret.to_string()));
        }
        Ok(NewRating {
            secret: secret.to_string(),
            who: required("who", self.who)?,
            url: required("url", self.url)?,
            mark: parse_mark(self.mark.as_ref().ok_or(RequestError::MissingField("mark"))?)?,
            cats: required("cats", self.cats)?,
            description: self.desc,
        })
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, RequestError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RequestError::MissingField(field)),
    }
}

// the browser popup posts form values, so "4" is as good as 4
fn parse_mark(value: &Value) -> Result<i32, RequestError> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) if s.trim().is_empty() => return Err(RequestError::MissingField("mark")),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| RequestError::InvalidMark(value.to_string()))
}

pub fn is_valid_secret(secret: &str) -> bool {
    !secret.is_empty() && secret.chars().all(|c| c.is_ascii_alphanumeric())
}

#[derive(Deserialize, Debug)]
pub struct ListQuery {
    pub order_by: Option<String>,
}

impl ListQuery {
    pub fn order(&self) -> Result<OrderBy, RequestError> {
        match &self.order_by {
            None => Ok(OrderBy::default()),
            Some(column) => column.parse(),
        }
    }
}

/// Columns a board may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderBy {
    Who,
    Url,
    Mark,
    Cats,
    Desc,
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::Mark
    }
}

impl FromStr for OrderBy {
    type Err = RequestError;

    fn from_str(column: &str) -> Result<Self, Self::Err> {
        match column {
            "who" => Ok(OrderBy::Who),
            "url" => Ok(OrderBy::Url),
            "mark" => Ok(OrderBy::Mark),
            "cats" => Ok(OrderBy::Cats),
            "desc" => Ok(OrderBy::Desc),
            _ => Err(RequestError::UnknownOrderColumn(column.to_string()))
        }
    }
}

// responses

#[derive(Serialize, Debug)]
pub struct PostResponse {
    pub success: bool,
    pub data: Value,
}
