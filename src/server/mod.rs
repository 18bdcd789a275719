pub mod rest;

pub use rest::{create_router, run_rest_server};
