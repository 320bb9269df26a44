pub mod resolvers;

pub use resolvers::register;
