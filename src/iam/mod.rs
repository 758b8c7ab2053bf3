pub mod accounts;

pub use accounts::{IamClient, ServiceAccount, ServiceAccountKey};
