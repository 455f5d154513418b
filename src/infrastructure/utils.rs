pub mod get_client_ip;
pub mod request_log;
pub mod valid_uuid;
