//! Memory Lane: a small family-memory service.
//!
//! Memory Lane keeps photo albums, a family timeline, written and recorded stories,
//! playlists with the memories attached to each song, and uploaded photos, videos,
//! and voice notes. Everything is served as JSON under `/api/memory-lane`.
//!
//! | Resource | Routes |
//! |----------|--------|
//! | **Albums** | `GET/POST /albums`, `GET/PUT/DELETE /albums/{id}` |
//! | **Timeline** | `GET/POST /timeline` (paged, ordered by date), `GET/DELETE /timeline/{id}` |
//! | **Stories** | `GET/POST /stories`, `GET/PUT/DELETE /stories/{id}`, `GET /stories/prompts` |
//! | **Music** | `GET/POST /music/playlists`, `POST /music/playlists/{id}/songs`, `GET/POST /music/songs/{id}/memory` |
//! | **Media** | `POST /upload/{photo,video,voice}`, `GET /media`, `GET /media/{id}/file`, `DELETE /media/{id}` |
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL) behind a single mutex; every write runs in a transaction
//!   and appends to an activity log
//! - **Media**: files on disk under per-category folders, with metadata and a SHA-256
//!   digest recorded in the database
//! - **Transport**: axum HTTP server with a uniform `{"success": ...}` envelope
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`lane`]: Record operations for every resource, plus snapshots and legacy import
//! - [`api`]: HTTP routes and the response envelope
//! - [`cli`]: Operator commands (stats, export, import, doctor, reset)

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod lane;
pub mod server;
