pub mod books;
pub mod cache;
pub mod handlers;
pub mod messages;
pub mod middleware;
pub mod quota;
pub mod routes;

pub use routes::create_router;
