// Service exports
pub mod arxiv;
pub mod datasets;
pub mod github;
pub mod profiles;
pub mod provider;

pub use arxiv::ArxivProvider;
pub use datasets::DatasetProvider;
pub use github::GithubProvider;
pub use profiles::{InMemoryProfileStore, PostgresProfileStore, ProfileStore, StoreError};
pub use provider::{build_http_client, Provider, ProviderError};
