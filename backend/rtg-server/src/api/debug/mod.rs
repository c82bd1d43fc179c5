pub mod connections;
pub mod connections_response;
