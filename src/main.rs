use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tilpress::config::{self, SiteConfig};
use tilpress::og::ResvgRasterizer;
use tilpress::routes::{Route, Site};
use tilpress::{feed, generate, output, scan};

#[derive(Parser)]
#[command(name = "tilpress")]
#[command(about = "Static blog builder with TIL notes, RSS and open graph images")]
#[command(long_about = "\
Static blog builder with TIL notes, RSS and open graph images

Markdown files with TOML front matter become pages. Every post and TIL also
gets a 1200x630 social preview image, and posts are syndicated in rss.xml.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── posts/
  │   ├── hello-world.md           # → /posts/hello-world/
  │   └── 2024/rust-tips.md        # → /posts/2024/rust-tips/
  └── tils/
      └── cargo-tree.md            # → /til/cargo-tree/

Front matter:

  +++
  title = \"Hello, World\"
  description = \"Why this blog exists.\"   # posts only
  tags = [\"rust\", \"cargo\"]              # tils only, optional
  published_at = 2024-01-15
  +++

Routes:
  /open-graph/posts/<slug>.png     Preview image for a post
  /open-graph/til/<slug>.png       Preview image for a TIL
  /rss.xml                         Feed of all posts

Run 'tilpress gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Absolute site URL, overrides [site].url
    #[arg(long, global = true)]
    site: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render pages, preview images and the feed into the output directory
    Build,
    /// Validate content and list every record without writing anything
    Check,
    /// Render a single preview image, e.g. /open-graph/posts/hello-world.png
    Og {
        /// Route path of the image
        route: String,
        /// Where to write the PNG (defaults to its place in the output directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the RSS feed to stdout
    Feed,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let site = load_site(&cli)?;
            output::print_scan_output(site.content(), &cli.source);

            init_thread_pool(&site.config().processing);
            let rasterizer = ResvgRasterizer::new(&site.config().og, &cli.source)?;

            println!("==> Generating → {}", cli.output.display());
            let report = generate::generate(&site, &rasterizer, &cli.output)?;
            output::print_build_output(&report, &cli.output);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site = load_site(&cli)?;
            output::print_scan_output(site.content(), &cli.source);
            println!("==> Content is valid");
        }
        Command::Og { route, out } => {
            let parsed = Route::parse(route)
                .filter(|r| matches!(r, Route::OgImage { .. }))
                .ok_or_else(|| format!("not an open graph image route: {route}"))?;
            let site = load_site(&cli)?;
            let rasterizer = ResvgRasterizer::new(&site.config().og, &cli.source)?;
            let response = site.respond(&parsed, &rasterizer)?;

            let dest = out
                .clone()
                .unwrap_or_else(|| cli.output.join(parsed.output_path()));
            write_file(&dest, &response.body)?;
            println!(
                "{}",
                output::format_route_output(&parsed, &dest, response.body.len())
            );
        }
        Command::Feed => {
            let content = scan::scan(&cli.source)?;
            let xml = feed::render_feed(
                &content.posts,
                cli.site.as_deref(),
                &content.config.site,
            )?;
            println!("{xml}");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scan the content root and apply CLI overrides to its config.
fn load_site(cli: &Cli) -> Result<Site, Box<dyn std::error::Error>> {
    let content = scan::scan(&cli.source)?;
    let config = effective_config(&content.config, cli.site.as_deref());
    config.validate()?;
    Ok(Site::new(content, config)?)
}

fn effective_config(base: &SiteConfig, site: Option<&str>) -> SiteConfig {
    let mut config = base.clone();
    if let Some(url) = site {
        config.site.url = url.to_string();
    }
    config
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
