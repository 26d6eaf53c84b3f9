use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_service::client::connect;
use catalog_service::LaptopClient;
use catalog_types::message::{RateLaptopResponse, UploadImageResponse};
use catalog_types::sample::{new_laptop, new_score};
use catalog_types::{Filter, Memory};
use clap::{Args, ValueEnum};
use tracing::info;

use crate::app::CatalogApp;
use crate::config::CatalogConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoFlow {
    Create,
    Search,
    Upload,
    Rate,
    All,
}

#[derive(Args, Clone, Debug)]
pub struct DemoArgs {
    /// Which client flow to run against the in-process server
    #[arg(long, value_enum, default_value_t = DemoFlow::All)]
    pub flow: DemoFlow,

    #[arg(long, default_value = "admin1")]
    pub username: String,

    #[arg(long, default_value = "secret")]
    pub password: String,

    /// Image file to upload; generated bytes are sent when omitted
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Upload chunk size in bytes
    #[arg(long, default_value_t = 1024)]
    pub chunk_size: usize,

    /// Number of rating rounds
    #[arg(long, default_value_t = 1)]
    pub rounds: usize,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            flow: DemoFlow::All,
            username: "admin1".into(),
            password: "secret".into(),
            image: None,
            chunk_size: 1024,
            rounds: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct DemoReport {
    pub created: Vec<String>,
    pub found: usize,
    pub upload: Option<UploadImageResponse>,
    pub ratings: Vec<RateLaptopResponse>,
}

pub async fn cmd_demo(args: DemoArgs, config: CatalogConfig) -> Result<()> {
    let app = CatalogApp::build(config).await?;
    let report = run_demo(&app, &args).await?;
    info!(
        created = report.created.len(),
        found = report.found,
        uploaded = report.upload.as_ref().map(|u| u.size).unwrap_or_default(),
        ratings = report.ratings.len(),
        "demo finished"
    );
    Ok(())
}

/// Logs in through a gated client and runs the selected flows.
pub async fn run_demo(app: &CatalogApp, args: &DemoArgs) -> Result<DemoReport> {
    let (client, gate) = connect(
        app.channel(),
        &args.username,
        &args.password,
        app.policy.protected_methods(),
        app.refresh_policy(),
    )
    .await
    .context("cannot create auth interceptor")?;

    let mut report = DemoReport::default();
    let all = args.flow == DemoFlow::All;
    if all || args.flow == DemoFlow::Create {
        report.created.push(client.create_laptop(new_laptop()).await?);
    }
    if all || args.flow == DemoFlow::Search {
        search_flow(&client, &mut report).await?;
    }
    if all || args.flow == DemoFlow::Upload {
        upload_flow(&client, args, &mut report).await?;
    }
    if all || args.flow == DemoFlow::Rate {
        rate_flow(&client, args.rounds, &mut report).await?;
    }

    gate.shutdown();
    Ok(report)
}

async fn search_flow(client: &LaptopClient, report: &mut DemoReport) -> Result<()> {
    for _ in 0..10 {
        report.created.push(client.create_laptop(new_laptop()).await?);
    }
    let filter = Filter {
        max_price_usd: 3000.0,
        min_cpu_cores: 4,
        min_cpu_ghz: 2.5,
        min_ram: Memory::gigabytes(8),
    };
    report.found = client.search_laptop(filter).await?.len();
    Ok(())
}

async fn upload_flow(
    client: &LaptopClient,
    args: &DemoArgs,
    report: &mut DemoReport,
) -> Result<()> {
    let (image, image_type) = match &args.image {
        Some(path) => {
            let image = tokio::fs::read(path)
                .await
                .with_context(|| format!("cannot open image file {}", path.display()))?;
            let image_type = path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_else(|| ".jpg".to_string());
            (image, image_type)
        }
        None => ((0..4096u32).map(|i| (i % 251) as u8).collect(), ".jpg".to_string()),
    };

    let id = client.create_laptop(new_laptop()).await?;
    report.created.push(id.clone());
    let response = client
        .upload_image(&id, &image_type, image, args.chunk_size)
        .await?;
    report.upload = Some(response);
    Ok(())
}

async fn rate_flow(client: &LaptopClient, rounds: usize, report: &mut DemoReport) -> Result<()> {
    let mut ids = Vec::with_capacity(3);
    for _ in 0..3 {
        ids.push(client.create_laptop(new_laptop()).await?);
    }
    report.created.extend(ids.iter().cloned());

    for round in 0..rounds {
        let scores: Vec<f64> = ids.iter().map(|_| new_score()).collect();
        info!(round, ?scores, "rating laptops");
        report.ratings.extend(client.rate_laptop(&ids, &scores).await?);
    }
    Ok(())
}
