pub mod constants;
pub mod http_handler;
pub mod query_params;
pub mod url_parser;
