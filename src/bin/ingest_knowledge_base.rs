/// Knowledge base ingestion helper
///
/// Uploads an AssistMe XML export to Azure Blob Storage and triggers the remote
/// ingestion function, then prints a summary of the run. Exits with 0 when
/// ingestion succeeds and 1 on failure or fatal error.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, Instrument};

use jurisprudence_mcp::config::{
    default_storage_root, function_url_for_app, BlobStoreConfig, DEFAULT_CONTAINER,
    DEFAULT_FUNCTION_APP, DEFAULT_STORAGE_ACCOUNT, DEFAULT_TENANT_ID,
    DEFAULT_TRIGGER_TIMEOUT_SECS,
};
use jurisprudence_mcp::ingestion::{
    account_url, analyze_xml_file, render_outline, render_summary, BlobCredential,
};
use jurisprudence_mcp::{IngestionClient, IngestionConfig, IngestionError};

/// Upload and ingest an AssistMe XML knowledge base
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to AssistMe XML file
    #[arg(long)]
    xml_file: PathBuf,

    /// Tenant identifier
    #[arg(long, env = "TENANT_ID", default_value = DEFAULT_TENANT_ID)]
    tenant_id: String,

    /// Only ingest ABGR-relevant articles
    #[arg(long)]
    abgr_only: bool,

    /// Custom blob name (defaults to filename)
    #[arg(long)]
    blob_name: Option<String>,

    /// Analyze XML structure without uploading
    #[arg(long, conflicts_with = "upload_only")]
    analyze_only: bool,

    /// Upload to blob storage without triggering ingestion
    #[arg(long)]
    upload_only: bool,

    /// Override function URL
    #[arg(long, env = "FUNCTION_URL")]
    function_url: Option<String>,

    /// Function app hosting the ingestion endpoint (used when no URL is given)
    #[arg(long, env = "FUNCTION_APP", default_value = DEFAULT_FUNCTION_APP)]
    function_app: String,

    /// Override function key
    #[arg(long, env = "FUNCTION_KEY", default_value = "", hide_env_values = true)]
    function_key: String,

    /// Storage account receiving the upload
    #[arg(long, env = "STORAGE_ACCOUNT", default_value = DEFAULT_STORAGE_ACCOUNT)]
    storage_account: String,

    /// Blob service endpoint (overrides the account's public endpoint)
    #[arg(long, env = "BLOB_ENDPOINT")]
    blob_endpoint: Option<String>,

    /// Shared access signature for the storage account
    #[arg(long, env = "STORAGE_SAS_TOKEN", hide_env_values = true, conflicts_with = "storage_token")]
    storage_sas_token: Option<String>,

    /// Entra ID access token for the storage account (e.g. from `az account get-access-token`)
    #[arg(long, env = "AZURE_STORAGE_TOKEN", hide_env_values = true)]
    storage_token: Option<String>,

    /// Store uploads in a local directory instead of the storage account
    #[arg(long)]
    local_storage: bool,

    /// Root directory of the local blob store (implies --local-storage)
    #[arg(long, env = "STORAGE_ROOT")]
    storage_root: Option<PathBuf>,

    /// Container that receives the upload
    #[arg(long, env = "KNOWLEDGE_CONTAINER", default_value = DEFAULT_CONTAINER)]
    container: String,

    /// Seconds to wait for each upload or trigger call
    #[arg(long, env = "INGESTION_TIMEOUT_SECS", default_value_t = DEFAULT_TRIGGER_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn ingestion_config(&self) -> IngestionConfig {
        IngestionConfig {
            blob_store: self.blob_store(),
            container_name: self.container.clone(),
            function_url: self
                .function_url
                .clone()
                .unwrap_or_else(|| function_url_for_app(&self.function_app)),
            function_key: self.function_key.clone(),
            tenant_id: self.tenant_id.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    fn blob_store(&self) -> BlobStoreConfig {
        if self.local_storage || self.storage_root.is_some() {
            return BlobStoreConfig::Local {
                root: self.storage_root.clone().unwrap_or_else(default_storage_root),
            };
        }

        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let credential = if let Some(token) = non_empty(&self.storage_sas_token) {
            BlobCredential::SasToken(token)
        } else if let Some(token) = non_empty(&self.storage_token) {
            BlobCredential::BearerToken(token)
        } else {
            BlobCredential::Anonymous
        };

        BlobStoreConfig::Azure {
            account_url: self
                .blob_endpoint
                .clone()
                .unwrap_or_else(|| account_url(&self.storage_account)),
            credential,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!("jurisprudence_mcp={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Fatal error: {}", e);
            eprintln!("\n❌ Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Run the requested mode; `Ok(false)` means the ingestion job reported failure
async fn run(args: &Args) -> Result<bool, IngestionError> {
    if args.analyze_only {
        println!("🔍 Analyzing XML structure: {}", args.xml_file.display());
        let outline = analyze_xml_file(&args.xml_file).await?;
        println!("\n{}", render_outline(&outline));
        println!("✓ Analysis complete");
        return Ok(true);
    }

    let config = args.ingestion_config();
    let client = config.build_client()?;

    let span = client.run_span(&config.tenant_id);
    upload_and_trigger(args, &config, &client)
        .instrument(span)
        .await
}

/// Upload, then trigger unless `--upload-only`, reporting progress on stdout
async fn upload_and_trigger(
    args: &Args,
    config: &IngestionConfig,
    client: &IngestionClient,
) -> Result<bool, IngestionError> {
    println!("✓ Blob store: {}", config.blob_store.describe());

    let start = Instant::now();
    let receipt = client
        .upload(&args.xml_file, args.blob_name.as_deref())
        .await?;
    println!(
        "✅ Uploaded to: {}/{} ({} bytes)",
        receipt.container, receipt.blob_name, receipt.size_bytes
    );
    println!("⏱️  Upload duration: {:.2} seconds", start.elapsed().as_secs_f64());

    if args.upload_only {
        println!("\n✅ Upload complete. Blob name: {}", receipt.blob_name);
        return Ok(true);
    }

    println!("\n🚀 Triggering ingestion function...");
    println!("📍 Function URL: {}", config.function_url);

    let result = client
        .trigger(&receipt.blob_name, &config.tenant_id, args.abgr_only)
        .await?;

    println!("\n{}", render_summary(&result));
    println!("\n⏱️  Total duration: {:.2} seconds", start.elapsed().as_secs_f64());

    Ok(result.success)
}
