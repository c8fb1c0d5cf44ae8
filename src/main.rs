use clap::{Parser, Subcommand};
use model_cache::utils::{logger, validation::Validate};
use model_cache::{download_object, upload_file, ModelStoreConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "model-cache")]
#[command(about = "Upload and fetch serialized model dictionary blobs in object storage")]
struct Cli {
    #[arg(long)]
    bucket: String,

    #[arg(long)]
    region: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a local model file to the bucket (overwrites the key)
    Upload {
        #[arg(long)]
        key: String,

        #[arg(long)]
        file: PathBuf,
    },
    /// Fetch a model blob from the bucket and write it to disk
    Fetch {
        #[arg(long)]
        key: String,

        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    // 驗證配置
    let config = ModelStoreConfig::for_bucket(&cli.bucket, cli.region.clone());
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Upload { key, file } => {
            upload_file(&cli.bucket, key, file, cli.region.as_deref())
                .await
                .map(|()| format!("📦 Uploaded {} to s3://{}/{}", file.display(), cli.bucket, key))
        }
        Command::Fetch { key, out } => {
            match download_object(&cli.bucket, cli.region.as_deref(), key).await {
                Ok(bytes) => match std::fs::write(out, &bytes) {
                    Ok(()) => Ok(format!(
                        "📦 Fetched s3://{}/{} ({} bytes) to {}",
                        cli.bucket,
                        key,
                        bytes.len(),
                        out.display()
                    )),
                    Err(e) => Err(e.into()),
                },
                Err(e) => Err(e),
            }
        }
    };

    match result {
        Ok(message) => {
            tracing::info!("Transfer completed successfully");
            println!("✅ {}", message);
        }
        Err(e) => {
            tracing::error!("Transfer failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
