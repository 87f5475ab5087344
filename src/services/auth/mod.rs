pub mod jwt;
pub mod policy;

pub use jwt::TokenError;
pub use policy::AuthPolicy;
