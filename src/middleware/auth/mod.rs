pub mod gate;
pub mod route_policy;
