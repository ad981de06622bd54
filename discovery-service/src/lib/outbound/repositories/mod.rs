pub mod contact;
pub mod discovery;
pub mod memory;
pub mod user;

pub use contact::PostgresContactRepository;
pub use discovery::PostgresDiscoveryRepository;
pub use memory::InMemoryContactRepository;
pub use memory::InMemoryDiscoveryRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;
