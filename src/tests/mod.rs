pub mod common;

mod background_refresh;
mod speech_requests;
