//! Carscout CLI library: command implementations shared by the `carscout` binary and its tests.
//!
//! **Public API**: [`run_search`], [`run_ping`], [`list_tools`], [`show_tool`], [`serve`],
//! [`CliError`].

use carscout::{
    default_registry, ConnectivityProbe, ListingsClient, ListingsConfig, RunError, SearchAgent,
    SearchRequest, ToolRegistry, ToolSource, ToolSourceError, ToolSpec,
};
use config::{AppConfig, ConfigError};
use tracing::info;

pub const APP_NAME: &str = "carscout";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Run(#[from] RunError),
    #[error("{0}")]
    Serve(#[from] serve::ServeError),
    #[error("{0}")]
    Tools(#[from] ToolSourceError),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Output format for `tool show`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolShowFormat {
    Yaml,
    Json,
}

fn registry(config: &AppConfig) -> Result<ToolRegistry, CliError> {
    let client = ListingsClient::new(ListingsConfig::from(config)).map_err(RunError::from)?;
    Ok(default_registry(client))
}

/// Runs one search. Returns the summary, or the whole conversation as pretty JSON when `json` is set.
pub async fn run_search(
    config: &AppConfig,
    request: SearchRequest,
    strict: bool,
    json: bool,
) -> Result<String, CliError> {
    if strict {
        config.validate_strict()?;
    }
    let agent = SearchAgent::from_config(config)?;
    let state = agent.run(request).await?;
    if json {
        return Ok(serde_json::to_string_pretty(&state)?);
    }
    Ok(state.summary().unwrap_or_default())
}

/// Sends the fixed arithmetic question and returns the model's reply.
pub async fn run_ping(config: &AppConfig) -> Result<String, CliError> {
    Ok(ConnectivityProbe::from_config(config)?.run().await?)
}

/// One `name: description` line per tool, or a JSON array when `json` is set.
pub async fn list_tools(config: &AppConfig, json: bool) -> Result<String, CliError> {
    let tools = registry(config)?.list_tools().await?;
    if json {
        return Ok(serde_json::to_string_pretty(&tools)?);
    }
    Ok(tools
        .iter()
        .map(|t| format!("{}: {}", t.name, t.description.as_deref().unwrap_or_default()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Full definition of one tool.
pub async fn show_tool(
    config: &AppConfig,
    name: &str,
    format: ToolShowFormat,
) -> Result<String, CliError> {
    let spec: ToolSpec = registry(config)?
        .list_tools()
        .await?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
    Ok(match format {
        ToolShowFormat::Json => serde_json::to_string_pretty(&spec)?,
        ToolShowFormat::Yaml => serde_yaml::to_string(&spec)?,
    })
}

/// Serves the HTTP wrapper until the process exits.
pub async fn serve(config: &AppConfig, addr: Option<&str>) -> Result<(), CliError> {
    let agent = SearchAgent::from_config(config)?;
    info!(addr = addr.unwrap_or(serve::DEFAULT_ADDR), "starting server");
    serve::run_serve(addr, serve::AppState::new(agent)).await?;
    Ok(())
}
