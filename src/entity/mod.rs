pub mod bookings;
pub mod guests;
pub mod rooms;
pub mod users;

pub use bookings::Entity as Bookings;
pub use guests::Entity as Guests;
pub use rooms::Entity as Rooms;
pub use users::Entity as Users;
