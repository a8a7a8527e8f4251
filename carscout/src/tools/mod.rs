//! Tools callable by the model and the registry that resolves them by name.

mod listings;
mod registry;
mod r#trait;

pub use listings::{SearchListingsArgs, SearchListingsTool, SEARCH_LISTINGS_TOOL};
pub use r#trait::Tool;
pub use registry::ToolRegistry;
