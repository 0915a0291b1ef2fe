// src/domain/request.rs
//
// Catalog requests. A request references content that was inserted with
// `visible = false`; approval flips the content visible, rejection removes
// the content and its links again.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRequest {
    pub id: i64,
    pub film_id: i64,
    pub requester_id: i64,
    pub approver_id: i64,
    pub approved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRequest {
    pub id: i64,
    pub series_id: i64,
    pub requester_id: i64,
    pub approver_id: i64,
    pub approved: bool,
}
