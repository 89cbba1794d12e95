//! # Typed Objects
//!
//! Contract-shaped request and reply values and the factory that creates them.

pub mod factory;
pub mod object;
pub mod value;

pub use factory::ObjectFactory;
pub use object::TypedObject;
pub use value::Value;
