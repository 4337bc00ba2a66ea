pub mod http;
pub mod remote;
