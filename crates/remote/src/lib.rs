#![forbid(unsafe_code)]

pub mod http;
pub mod store;
pub mod wire;

pub use http::{HttpStore, RemoteConfig};
pub use store::{CardRecord, CardStore, InMemoryStore, NewCardRecord, StoreError, SubjectStore};
