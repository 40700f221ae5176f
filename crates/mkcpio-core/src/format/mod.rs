//! On-disk archive format.

pub mod newc;

pub use newc::NewcHeader;
