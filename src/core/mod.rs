//! Core soundboard logic, independent of Discord.
//!
//! Everything here works on plain names, paths and bytes so it can be exercised
//! without a gateway connection.

/// Button action tokens
pub mod action;
/// Attachment downloads with a bounded timeout
pub mod fetch;
/// Group creation, deletion and membership
pub mod group;
/// Paginated button grid layout
pub mod layout;
/// Validation of user-supplied names as filesystem entries
pub mod path;
/// Autocomplete queries
pub mod search;
/// Sound upload, listing and removal
pub mod sound;
/// Storage capability trait and filesystem backend
pub mod storage;
