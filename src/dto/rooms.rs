use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Room, RoomStatus, RoomType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    pub room_number: String,
    pub room_type: RoomType,
    pub price: i64,
    pub capacity: i32,
    pub status: Option<RoomStatus>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRoomRequest {
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    pub price: Option<i64>,
    pub capacity: Option<i32>,
    pub status: Option<RoomStatus>,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoomList {
    pub items: Vec<Room>,
}
