use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tarpull::{Fetcher, HttpClient, HttpClientConfig, NpmClient, RegistryQuery};

#[derive(Parser, Debug)]
#[command(name = "tarpull")]
#[command(about = "Look up npm release metadata and fetch release tarballs")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the published versions of a package
    Releases {
        /// Package name
        package: String,
    },

    /// Print the tarball URL of one release
    Tarball {
        /// Package name
        package: String,

        /// Exact version of the release
        version: String,
    },

    /// Download a tarball URL into a directory
    Fetch {
        /// URL of the file to download
        url: String,

        /// Directory to place the file in
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,

        /// Ignore proxy settings from the npm configuration
        #[arg(long)]
        no_proxy: bool,
    },

    /// Show the proxy settings the registry client is configured with
    Proxy,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("{} {}", style("error:").red().bold(), e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(args: Args) -> Result<()> {
    let query = RegistryQuery::new(NpmClient::new());

    match args.command {
        Commands::Releases { package } => {
            for version in query.releases(&package).await? {
                println!("{version}");
            }
        }

        Commands::Tarball { package, version } => {
            println!("{}", query.tarball(&package, &version).await?);
        }

        Commands::Proxy => {
            let proxies = query.proxy().await?;
            println!("proxy:       {}", proxies.proxy.as_deref().unwrap_or("(unset)"));
            println!(
                "https-proxy: {}",
                proxies.https_proxy.as_deref().unwrap_or("(unset)")
            );
        }

        Commands::Fetch { url, dest, no_proxy } => {
            let mut config = HttpClientConfig::new();
            if !no_proxy {
                config = config.with_proxies(&query.proxy().await?);
            }
            let fetcher = Fetcher::new(Arc::new(HttpClient::with_config(config)?));

            let bar = ProgressBar::new(0);
            bar.set_style(ProgressStyle::with_template(
                "{bytes}/{total_bytes} [{wide_bar}]",
            )?);

            let path = fetcher
                .fetch_with_progress(
                    &url,
                    &dest,
                    Some(|downloaded, total| {
                        if total > 0 {
                            bar.set_length(total);
                        }
                        bar.set_position(downloaded);
                    }),
                )
                .await?;
            bar.finish_and_clear();

            println!("{}", path.display());
        }
    }

    Ok(())
}
