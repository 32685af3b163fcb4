pub mod jobscape;
pub mod user;
