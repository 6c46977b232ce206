/// User courses and home club layout.
pub mod courses;
/// Public contact and interest form submissions.
pub mod intake;
/// Database model definitions.
pub mod models;
/// Ordered per-user lists (bag clubs, mental elements).
pub mod ordered;
/// Rounds and their hole snapshots.
pub mod rounds;
/// Storage error types shared by every backend.
pub mod storage;
/// Strokes recorded within rounds.
pub mod strokes;
/// Generic table query boundary and its backends.
pub mod table_store;
