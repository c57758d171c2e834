pub mod cache;
pub mod config;
pub mod member;
pub mod pager;
pub mod reconcile;
pub mod sentences;
