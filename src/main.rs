//! CLI entry point for techblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "techblog")]
#[command(author = "Tarun Sharma")]
#[command(version)]
#[command(about = "A personal tech blog served from markdown posts on GitHub", long_about = None)]
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
    /// Start the blog server
    #[command(alias = "s", alias = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List posts or tags
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Print a single post
    Show {
        /// Slug of the post
        slug: String,

        /// Print rendered HTML instead of markdown
        #[arg(long)]
        html: bool,
    },

    /// Create a new post in the local content directory
    New {
        /// Title of the new post
        title: String,

        /// File name to use instead of one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "techblog=debug,info"
    } else {
        "techblog=info"
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
        Commands::Serve { port, ip, open } => {
            let blog = techblog::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            techblog::server::start(&blog, &ip, port, open).await?;
        }

        Commands::List { r#type } => {
            let blog = techblog::Blog::new(&base_dir)?;
            techblog::commands::list::run(&blog, &r#type).await?;
        }

        Commands::Show { slug, html } => {
            let blog = techblog::Blog::new(&base_dir)?;
            techblog::commands::show::run(&blog, &slug, html).await?;
        }

        Commands::New { title, slug } => {
            let blog = techblog::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            blog.new_post(&title, slug.as_deref())?;
        }

        Commands::Version => {
            println!("techblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
