use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::serde_helpers::{double_option, flexible_bool, timestamp};

/// An announcement joined with the name of the user who posted it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub image: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_urgent: bool,
    pub announcer_id: Uuid,
    pub announcer: String,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(deserialize_with = "flexible_bool::deserialize")]
    pub is_urgent: bool,
    pub announcer_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnouncementRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "flexible_bool::option")]
    pub is_urgent: Option<bool>,
    #[serde(default)]
    pub announcer_id: Option<Uuid>,
}

impl UpdateAnnouncementRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.image.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.is_urgent.is_none()
            && self.announcer_id.is_none()
    }
}
