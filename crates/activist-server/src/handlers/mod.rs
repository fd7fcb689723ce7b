//! Request handlers

pub mod admin;
pub mod api;
pub mod chat;
pub mod site;
pub mod static_files;
