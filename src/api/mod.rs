//! API Module
//!
//! HTTP handlers and routing for the admin dashboard.
//!
//! # Endpoints
//! - `PUT /cache/entries` - Store a value
//! - `GET|DELETE /cache/entries/:key` - Read or invalidate a key
//! - `GET /cache/entries/:key/info` - Entry diagnostics
//! - `POST /cache/invalidate` - Invalidate keys containing a substring
//! - `GET /cache/top` - Most-hit keys
//! - `GET /cache/stats` - Cache statistics
//! - `POST /cache/clear` / `POST /cache/cleanup` - Drop all / expired entries
//! - `POST /ratelimit/check` - Run a general or per-action check
//! - `GET|DELETE /ratelimit/users/:user_id` - Inspect or reset a user
//! - `POST /ratelimit/cleanup` - Drop idle users
//! - `GET /ratelimit/summary` - Limiter totals
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
