//! Package index implementations

pub mod dotnet_cli;
pub mod nuget_org;
pub mod type_search;

pub use dotnet_cli::DotnetCliIndex;
pub use nuget_org::NugetOrgIndex;
pub use type_search::TypeSearchClient;
