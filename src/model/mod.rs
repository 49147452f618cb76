pub mod member;
pub mod pending_member;
pub mod position;
pub mod pto_request;
