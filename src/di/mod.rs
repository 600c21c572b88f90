mod builder;
mod container;
mod injectable;
mod services;

pub use builder::ContainerBuilder;
pub use container::Container;
pub use injectable::Injectable;
pub use services::Services;
