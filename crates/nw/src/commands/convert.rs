//! `nw convert` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use nw_compiler::{ConversionResult, Converter, MediaResolver, Mode, Renderer, slugify};
use nw_config::{CliSettings, Config, NotionConfig, WebflowConfig};
use nw_notion::NotionClient;
use nw_webflow::{HttpFetcher, WebflowClient};
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Notion page ID to convert.
    page_id: String,

    /// Publish mode: re-host images on Webflow and wrap for embedding.
    #[arg(long)]
    publish: bool,

    /// Print the full conversion result as JSON.
    #[arg(long)]
    json: bool,

    /// Write output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover nw.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum block nesting depth (overrides config).
    #[arg(long)]
    max_depth: Option<usize>,

    /// Fetch sibling subtrees in parallel (overrides config).
    #[arg(long)]
    parallel: bool,

    /// Syntax highlighting theme (overrides config).
    #[arg(long)]
    theme: Option<String>,

    /// Enable verbose output (show fetch and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// JSON output: the conversion result plus the title slug.
#[derive(Serialize)]
struct JsonOutput {
    #[serde(flatten)]
    result: ConversionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
}

impl From<ConversionResult> for JsonOutput {
    fn from(result: ConversionResult) -> Self {
        let slug = result.title.as_deref().map(slugify);
        Self { result, slug }
    }
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the conversion fails or
    /// the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            max_depth: self.max_depth,
            parallel_fetch: self.parallel.then_some(true),
            theme: self.theme.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        debug!(path = ?config.config_path, "Loaded configuration");

        let mode = Mode::from_publish_flag(self.publish);
        let timeout = Duration::from_secs(config.convert.timeout_secs);

        let client = create_notion_client(config.require_notion()?, timeout);
        let mut renderer = Renderer::new().with_theme(config.convert.theme.as_str());
        if mode == Mode::Publish {
            let media = create_media_resolver(
                config.require_webflow()?,
                timeout,
                config.convert.max_image_bytes,
            );
            renderer = renderer.with_media(media);
        }

        let converter = Converter::new(client, renderer)
            .with_max_depth(config.convert.max_depth)
            .with_parallel_fetch(config.convert.parallel_fetch);

        output.info(&format!("Converting page {} ({mode})...", self.page_id));

        if self.json {
            let result = converter.convert_to_result(&self.page_id, mode);
            let failure = result.error.clone();
            let json = serde_json::to_string_pretty(&JsonOutput::from(result))?;
            self.write(&output, &json)?;
            return match failure {
                Some(message) => Err(CliError::Reported(message)),
                None => Ok(()),
            };
        }

        let conversion = converter.convert(&self.page_id, mode)?;
        output.highlight(&format!("Title: {}", conversion.title));
        self.write(&output, &conversion.markup)
    }

    fn write(&self, output: &Output, content: &str) -> Result<(), CliError> {
        match &self.output {
            Some(path) => {
                std::fs::write(path, content)?;
                output.success(&format!(
                    "Wrote {} bytes to {}",
                    content.len(),
                    path.display()
                ));
            }
            None => Output::document(content)?,
        }
        Ok(())
    }
}

fn create_notion_client(notion: &NotionConfig, timeout: Duration) -> NotionClient {
    let mut client = NotionClient::new(notion.api_key.as_str()).with_timeout(timeout);
    if let Some(base_url) = &notion.base_url {
        client = client.with_base_url(base_url);
    }
    if let Some(version) = &notion.version {
        client = client.with_version(version.as_str());
    }
    if let Some(page_size) = notion.page_size {
        client = client.with_page_size(page_size);
    }
    client
}

fn create_media_resolver(
    webflow: &WebflowConfig,
    timeout: Duration,
    max_image_bytes: u64,
) -> MediaResolver {
    let mut uploader =
        WebflowClient::new(webflow.api_key.as_str(), webflow.site_id.as_str()).with_timeout(timeout);
    if let Some(base_url) = &webflow.base_url {
        uploader = uploader.with_base_url(base_url);
    }
    let fetcher = HttpFetcher::new()
        .with_timeout(timeout)
        .with_max_bytes(max_image_bytes);
    MediaResolver::new(Box::new(fetcher), Box::new(uploader))
}
