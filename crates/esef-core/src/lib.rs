pub mod config;
pub mod logging;

pub mod downloader;
pub mod http;
pub mod index;
pub mod sync;
pub mod url_model;
