// Application layer - Use cases over the fleet repository
pub mod fleet_repository;
pub mod history_service;
pub mod live_service;
pub mod waypoint_cache;
