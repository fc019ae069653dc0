//! Collaborator traits for backend, storage, navigation, and alerting.

mod alerts;
mod backend;
mod events;
mod key_store;
mod navigator;

pub use alerts::Alerts;
pub use backend::Backend;
pub use events::EventStream;
pub use key_store::KeyStore;
pub use navigator::Navigator;
