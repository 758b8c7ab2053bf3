pub mod response;
pub mod time;
