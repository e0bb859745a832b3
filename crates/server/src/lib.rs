pub mod api;
pub mod config;
pub mod db;
pub mod entity;
pub mod executor;
pub mod repository;
pub mod service;
