pub mod events;
pub mod invite;
pub mod request;
pub mod requests;
