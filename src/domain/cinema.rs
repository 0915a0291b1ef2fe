// src/domain/cinema.rs

use serde::{Deserialize, Serialize};

/// A cinema venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cinema {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub province: String,
}

/// Marks a cinema as near a user's residence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyCinema {
    pub user_id: i64,
    pub cinema_id: i64,
}
