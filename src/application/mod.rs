//! Application services: the front-end controller and the posts service
//! behind the REST API.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod inflight;
pub mod posts;
pub mod repos;
