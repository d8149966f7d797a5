use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    availability::Availability,
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bookings::{BookingDetail, BookingList, CreateBookingRequest, UpdateBookingRequest},
        dashboard::DashboardStats,
        guests::{CreateGuestRequest, GuestList, UpdateGuestRequest},
        rooms::{CreateRoomRequest, RoomList, UpdateRoomRequest},
    },
    models::{
        Booking, BookingStatus, Guest, PaymentStatus, Room, RoomStatus, RoomType, User, UserRole,
    },
    response::{ApiResponse, Meta},
    routes::{auth, bookings, dashboard, guests, health, health::HealthData, params, rooms},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        rooms::list_rooms,
        rooms::get_room,
        rooms::room_availability,
        rooms::create_room,
        rooms::update_room,
        rooms::delete_room,
        guests::list_guests,
        guests::get_guest,
        guests::create_guest,
        guests::update_guest,
        guests::delete_guest,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::create_booking,
        bookings::update_booking,
        bookings::delete_booking,
        dashboard::stats
    ),
    components(
        schemas(
            User,
            UserRole,
            Room,
            RoomType,
            RoomStatus,
            Guest,
            Booking,
            BookingStatus,
            PaymentStatus,
            Availability,
            DashboardStats,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateRoomRequest,
            UpdateRoomRequest,
            RoomList,
            CreateGuestRequest,
            UpdateGuestRequest,
            GuestList,
            CreateBookingRequest,
            UpdateBookingRequest,
            BookingList,
            BookingDetail,
            params::Pagination,
            params::RoomQuery,
            params::GuestQuery,
            params::BookingListQuery,
            params::AvailabilityQuery,
            Meta,
            HealthData,
            ApiResponse<HealthData>,
            ApiResponse<User>,
            ApiResponse<LoginResponse>,
            ApiResponse<Room>,
            ApiResponse<RoomList>,
            ApiResponse<Guest>,
            ApiResponse<GuestList>,
            ApiResponse<Booking>,
            ApiResponse<BookingDetail>,
            ApiResponse<BookingList>,
            ApiResponse<Availability>,
            ApiResponse<DashboardStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Rooms", description = "Room inventory and availability"),
        (name = "Guests", description = "Guest directory"),
        (name = "Bookings", description = "Reservations"),
        (name = "Dashboard", description = "Occupancy and revenue statistics"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
