//! CLI entry point for landing-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use landing_rs::content::ContentType;

#[derive(Parser)]
#[command(name = "landing-rs")]
#[command(author = "Yukang Chen")]
#[command(version = "0.1.0")]
#[command(about = "Landing page server with an email waitlist and markdown content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new content file
    New {
        /// Content type (blog-post, comparison, faq)
        #[arg(short = 't', long = "type", default_value = "blog-post")]
        content_type: ContentType,

        /// Title of the new item
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Export the site as static files
    #[command(alias = "g")]
    Generate,

    /// Start the web server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Clean the public folder
    Clean,

    /// List site content
    List {
        /// Type of content to list (all, blog-post, comparison, faq)
        #[arg(default_value = "all")]
        r#type: String,
    },

    /// Print the number of waitlist signups
    Count,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "landing_rs=debug,info"
    } else {
        "landing_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New {
            content_type,
            title,
            slug,
        } => {
            let site = landing_rs::Site::new(&base_dir)?;
            site.new_post(&title, content_type, slug.as_deref())?;
        }

        Commands::Generate => {
            let site = landing_rs::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = landing_rs::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            landing_rs::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = landing_rs::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = landing_rs::Site::new(&base_dir)?;
            landing_rs::commands::list::run(&site, &r#type)?;
        }

        Commands::Count => {
            let site = landing_rs::Site::new(&base_dir)?;
            landing_rs::commands::count::run(&site).await?;
        }

        Commands::Version => {
            println!("landing-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
