//! Static writing content bundled with the app.

pub mod quotes;
pub mod templates;
