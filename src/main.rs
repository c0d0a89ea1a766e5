use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Deserialize;

use pagefx::{EffectsConfig, PageEffects, Viewport};

/// Replay a scroll timeline against a page and print the final effect state.
#[derive(Parser)]
#[command(name = "pagefx", version, about)]
struct Cli {
    /// Page URL to load (requires the `fetch` feature)
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,

    /// Local HTML file to load
    #[arg(long)]
    file: Option<PathBuf>,

    /// JSON timeline of steps to replay, e.g.
    /// [{"op":"scroll_to","y":900},{"op":"frames","count":60}]
    #[arg(long)]
    timeline: Option<PathBuf>,

    /// Viewport as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720")]
    viewport: String,

    /// Frames to run after the timeline so transitions settle
    #[arg(long, default_value_t = 120)]
    settle: u32,

    /// Print the snapshot as pretty JSON instead of the plain description
    #[arg(long)]
    json: bool,

    /// Print only the SHA-256 digest of the final snapshot
    #[arg(long)]
    digest: bool,
}

/// One replayable step of a timeline file.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    ScrollTo { y: f64 },
    Click { href: String },
    Submit,
    Frames { count: u32 },
}

fn parse_viewport(s: &str) -> anyhow::Result<Viewport> {
    let (w, h) = s
        .split_once('x')
        .context("viewport must be WIDTHxHEIGHT, e.g. 1280x720")?;
    Ok(Viewport {
        width: w.trim().parse().context("invalid viewport width")?,
        height: h.trim().parse().context("invalid viewport height")?,
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = EffectsConfig {
        viewport: parse_viewport(&cli.viewport)?,
        ..Default::default()
    };
    let mut engine = pagefx::new_engine(config)?;

    if let Some(url) = &cli.url {
        #[cfg(feature = "fetch")]
        engine.load_url(url)?;
        #[cfg(not(feature = "fetch"))]
        {
            let _ = url;
            bail!("this build has no `fetch` feature; load a local file with --file");
        }
    } else if let Some(file) = &cli.file {
        let html = fs::read_to_string(file)
            .with_context(|| format!("reading {}", file.display()))?;
        engine.load_html(&html, None)?;
    } else {
        bail!("one of --url or --file is required");
    }

    let steps: Vec<Step> = match &cli.timeline {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&data).context("parsing timeline")?
        }
        None => Vec::new(),
    };

    for step in steps {
        match step {
            Step::ScrollTo { y } => engine.scroll_to(y),
            Step::Click { href } => {
                if !engine.click_anchor(&href) {
                    log::debug!("timeline click {:?} had no target", href);
                }
            }
            Step::Submit => {
                engine.submit_form();
            }
            Step::Frames { count } => engine.run_frames(count),
        }
    }
    engine.run_frames(cli.settle);

    let snap = engine.snapshot()?;
    if cli.digest {
        println!("{}", snap.digest()?);
    } else if cli.json {
        println!("{}", snap.to_json()?);
    } else {
        print!("{}", snap.describe());
    }

    Ok(())
}
