pub mod crud_engine;
pub mod policy;

pub use crud_engine::*;
pub use policy::*;
