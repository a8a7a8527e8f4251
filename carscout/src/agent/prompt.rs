//! Fixed prompts.

use crate::state::SearchRequest;
use crate::tools::SEARCH_LISTINGS_TOOL;

/// System message prepended to every model call; disables reasoning output.
pub const SYSTEM_PROMPT: &str = "/no_think";

pub const PROBE_SYSTEM_PROMPT: &str = "You are a precise, one-sentence arithmetic assistant.";
pub const PROBE_QUESTION: &str = "What is the result of 2 + 2?";

/// User prompt that asks the model to call the listings tool for `request`.
pub fn search_prompt(request: &SearchRequest) -> String {
    format!(
        "Please find car listings for a {} {} {} near zip code {} within {} miles. Use the {} tool.",
        request.year, request.make, request.model, request.zip_code, request.distance, SEARCH_LISTINGS_TOOL
    )
}
