//! video-finder - search YouTube videos and look up channels
//!
//! Thin command-line front end over the `video_finder` library. Responses are
//! cached on disk, so running the same search twice within the cache TTL
//! costs no API quota.

use clap::Parser;
use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use video_finder::cli::{Cli, Command};
use video_finder::data::{YoutubeChannel, YoutubeFinder, YoutubeVideo};

/// Builds the subscriber injected into the client
///
/// `-v` flags win over `RUST_LOG`; without either only warnings are shown.
fn log_sink(verbose: u8) -> Dispatch {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("video_finder=info"),
        _ => EnvFilter::new("video_finder=debug"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    Dispatch::new(subscriber)
}

fn print_videos(videos: &[YoutubeVideo], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(videos)?);
        return Ok(());
    }
    for video in videos {
        let duration = video.duration.as_deref().unwrap_or("-");
        println!(
            "{}  {:>10}  {}  {}",
            video.published_at.format("%Y-%m-%d"),
            duration,
            video.url(),
            video.title
        );
    }
    Ok(())
}

fn print_channels(channels: &[YoutubeChannel], json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(channels)?);
        return Ok(());
    }
    for channel in channels {
        println!("{}  {}", channel.channel_id, channel.title);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = cli.client_config().with_log_sink(log_sink(cli.verbose));
    let mut finder = YoutubeFinder::new(config)?;

    match &cli.command {
        Command::Search(args) => {
            let params = args.to_params();
            let videos = if args.details {
                finder.get_videos(&params)?
            } else {
                finder.search_videos(&params)?
            };
            print_videos(&videos, cli.json)?;
        }
        Command::Channels { ids } => {
            let channels = finder.get_channels(ids)?;
            print_channels(&channels, cli.json)?;
        }
        Command::Videos { ids } => {
            let videos = finder.get_videos_by_id(ids)?;
            print_videos(&videos, cli.json)?;
        }
    }

    Ok(())
}
