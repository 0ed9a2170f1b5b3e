//! Core domain types shared by the grant engine and storage backends.

pub mod client;

pub use client::{Client, ClientValidationError, ResponseType};
