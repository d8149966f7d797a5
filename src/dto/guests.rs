use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Guest;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGuestRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_number: Option<String>,
    pub id_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateGuestRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub id_number: Option<String>,
    pub id_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuestList {
    pub items: Vec<Guest>,
}
