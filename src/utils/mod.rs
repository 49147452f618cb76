pub mod db_utils;
pub mod email_filter;
pub mod staff_cache;
