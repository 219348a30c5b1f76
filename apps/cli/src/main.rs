use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tubemark_core::{
    ApiConfig, DEFAULT_TAG, DetailsMode, ListOptions, MarkerPair, MarkupStyle, SearchOrder,
    ShortsRule, UpdateOutcome, YoutubeClient, list_videos, lister, resolve_channel_id,
    update_document,
};

/// CLI wrappers for core enums (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliOrder {
    #[default]
    Date,
    ViewCount,
}

impl From<CliOrder> for SearchOrder {
    fn from(cli: CliOrder) -> Self {
        match cli {
            CliOrder::Date => SearchOrder::Date,
            CliOrder::ViewCount => SearchOrder::ViewCount,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliStyle {
    #[default]
    Markdown,
    Html,
}

impl From<CliStyle> for MarkupStyle {
    fn from(cli: CliStyle) -> Self {
        match cli {
            CliStyle::Markdown => MarkupStyle::Markdown,
            CliStyle::Html => MarkupStyle::Html,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliShortsRule {
    /// Shorter than 60 seconds
    #[default]
    MinDuration,
    /// Any minutes or seconds component (legacy, over-matches)
    ComponentPresence,
    /// Shorter than 60 seconds and vertical
    VerticalMinDuration,
    /// Keep every video
    None,
}

impl From<CliShortsRule> for ShortsRule {
    fn from(cli: CliShortsRule) -> Self {
        match cli {
            CliShortsRule::MinDuration => ShortsRule::MinDuration,
            CliShortsRule::ComponentPresence => ShortsRule::ComponentPresence,
            CliShortsRule::VerticalMinDuration => ShortsRule::VerticalMinDuration,
            CliShortsRule::None => ShortsRule::None,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliDetails {
    #[default]
    Batched,
    Concurrent,
}

impl From<CliDetails> for DetailsMode {
    fn from(cli: CliDetails) -> Self {
        match cli {
            CliDetails::Batched => DetailsMode::Batched,
            CliDetails::Concurrent => DetailsMode::Concurrent,
        }
    }
}

#[derive(Parser)]
#[command(name = "tubemark")]
#[command(about = "Rewrite a README section with a channel's latest YouTube videos")]
struct Cli {
    /// Channel id. Defaults to $YOUTUBE_CHANNEL_ID.
    #[arg(short, long)]
    channel_id: Option<String>,

    /// YouTube Data API key. Defaults to $YOUTUBE_API_KEY.
    #[arg(long)]
    api_key: Option<String>,

    /// Document to update
    #[arg(short, long, default_value = "README.md")]
    readme: PathBuf,

    /// Marker tag, as in <!-- TAG:START --> / <!-- TAG:END -->
    #[arg(short, long, default_value = DEFAULT_TAG)]
    tag: String,

    /// Listing order
    #[arg(short, long, value_enum, default_value_t)]
    order: CliOrder,

    /// Generated markup
    #[arg(short, long, value_enum, default_value_t)]
    style: CliStyle,

    /// How short-form clips are recognised
    #[arg(long, value_enum, default_value_t)]
    shorts_rule: CliShortsRule,

    /// How per-video durations are fetched
    #[arg(long, value_enum, default_value_t)]
    details: CliDetails,

    /// Search results to request before filtering
    #[arg(long, default_value_t = lister::DEFAULT_FETCH_LIMIT)]
    fetch_limit: u32,

    /// Videos to keep after filtering
    #[arg(short, long, default_value_t = lister::DEFAULT_MAX_VIDEOS)]
    max_videos: usize,

    /// Print the new section instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[arg(long, hide = true)]
    base_url: Option<String>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "tubemark=debug,tubemark_core=debug"
    } else {
        "tubemark=info,tubemark_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Validate configuration before touching the network
    let mut api = ApiConfig::resolve(cli.api_key)?;
    if let Some(base_url) = cli.base_url {
        api = api.with_base_url(base_url);
    }
    let channel_id = resolve_channel_id(cli.channel_id)?;
    let markers = MarkerPair::new(&cli.tag)?;
    let markup_style: MarkupStyle = cli.style.into();

    let options = ListOptions {
        order: cli.order.into(),
        fetch_limit: cli.fetch_limit,
        max_videos: cli.max_videos,
        rule: cli.shorts_rule.into(),
        details_mode: cli.details.into(),
        ..ListOptions::new(channel_id)
    };
    debug!(?options, readme = %cli.readme.display(), tag = %cli.tag, "resolved configuration");

    println!(
        "\n{}  {}\n",
        style("tubemark").cyan().bold(),
        style("README video section").dim()
    );

    // Step 1: List videos
    let spinner = create_spinner(&format!("Fetching videos for {}...", options.channel_id));
    let client = YoutubeClient::new(api);
    let videos = match list_videos(&client, &options).await {
        Ok(videos) => videos,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    spinner.finish_with_message(format!(
        "{} Fetched {} videos {}",
        style("✓").green().bold(),
        videos.len(),
        style(format!(
            "(order: {}, shorts: {})",
            options.order.as_param(),
            options.rule.name()
        ))
        .dim()
    ));

    // Step 2: Update document
    let spinner = create_spinner(&format!("Updating {}...", cli.readme.display()));
    let updated = update_document(&cli.readme, &markers, &videos, markup_style, cli.dry_run).await;
    let outcome = match updated {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    match outcome {
        UpdateOutcome::Unchanged => spinner.finish_with_message(format!(
            "{} No new videos {}",
            style("✓").green().bold(),
            style(format!("({} is up to date)", cli.readme.display())).dim()
        )),
        UpdateOutcome::Written => spinner.finish_with_message(format!(
            "{} Updated {}",
            style("✓").green().bold(),
            style(cli.readme.display()).cyan()
        )),
        UpdateOutcome::Pending(document) => {
            spinner.finish_with_message(format!(
                "{} Would update {} {}",
                style("✓").green().bold(),
                style(cli.readme.display()).cyan(),
                style("(dry run)").dim()
            ));
            println!("{}", style("─".repeat(60)).dim());
            println!("{}", document);
        }
    }

    Ok(())
}
