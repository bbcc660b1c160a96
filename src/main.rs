//! Standalone CLI: exports every scene to SVG and optionally steps
//! through the slideshow from stdin
//!
//! Run with: cargo run --features cli --bin story

use std::path::Path;

use covid_story::config::StoryConfig;
use covid_story::core::scenes::{selector_options, ExploreDetails};
use covid_story::core::{from_reader, Dataset, Scene, SceneView, Selection, Slideshow};
use covid_story::svg;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,covid_story=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = StoryConfig::from_env();

    info!(path = %config.data_path.display(), "Loading dataset");
    let bytes = tokio::fs::read(&config.data_path).await?;
    let raw = from_reader(&bytes[..])?;
    let dataset = if config.all_rows { raw } else { raw.latest_per_country() };
    info!(records = dataset.len(), "Dataset loaded");

    tokio::fs::create_dir_all(&config.out_dir).await?;

    // Walk the slideshow in order so the explorer inherits the last metric.
    let mut show = Slideshow::default();
    loop {
        let scene = show.scene();
        let view = show.render(&dataset);
        let stem = format!("scene-{}-{}", scene.index() + 1, scene.slug());
        write_view(&config.out_dir, &stem, &view, config.json).await?;
        info!(scene = scene.slug(), marks = view.mark_count(), "Scene exported");
        if !show.next() {
            break;
        }
    }
    show.go_to(0);

    if !config.interactive {
        return Ok(());
    }

    info!("Interactive mode: next, prev, goto <n>, select <metric|country>, clear, list, quit");
    write_view(&config.out_dir, "current", &show.render(&dataset), config.json).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match run_command(&mut show, &dataset, line.trim()) {
                    Command::Quit => break,
                    Command::Unchanged => {}
                    Command::Rerender => {
                        let view = show.render(&dataset);
                        log_view(&show, &view);
                        write_view(&config.out_dir, "current", &view, config.json).await?;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

enum Command {
    Rerender,
    Unchanged,
    Quit,
}

fn run_command(show: &mut Slideshow, dataset: &Dataset, line: &str) -> Command {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => Command::Unchanged,
        "next" | "n" => moved(show.next()),
        "prev" | "p" => moved(show.prev()),
        "goto" | "g" => match arg.parse::<usize>() {
            Ok(n) if n >= 1 => moved(show.go_to(n - 1)),
            _ => {
                warn!(arg, "goto expects a scene number starting at 1");
                Command::Unchanged
            }
        },
        "select" | "s" if !arg.is_empty() => {
            if !show.explore_active() {
                show.go_to(Scene::Explore.index());
            }
            show.select(Selection::parse(arg));
            Command::Rerender
        }
        "clear" => {
            show.clear_country();
            Command::Rerender
        }
        "list" => {
            for option in selector_options(dataset) {
                println!("{}", option.label());
            }
            Command::Unchanged
        }
        "quit" | "q" | "exit" => Command::Quit,
        other => {
            warn!(command = other, "Unknown command");
            Command::Unchanged
        }
    }
}

fn moved(changed: bool) -> Command {
    if changed {
        Command::Rerender
    } else {
        Command::Unchanged
    }
}

fn log_view(show: &Slideshow, view: &SceneView) {
    info!(
        scene = %format!("{}/{}", show.cursor() + 1, show.scene_count()),
        title = view.title(),
        marks = view.mark_count(),
        "Rendered"
    );
    if let SceneView::Scatter(scatter) = view {
        match scatter.explore.as_ref().map(|p| &p.details) {
            Some(ExploreDetails::Stats(lines)) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Some(ExploreDetails::NoData(msg)) => println!("{}", msg),
            _ => {}
        }
    }
}

async fn write_view(
    dir: &Path,
    stem: &str,
    view: &SceneView,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let svg_path = dir.join(format!("{}.svg", stem));
    tokio::fs::write(&svg_path, svg::render(view)).await?;
    debug!(path = %svg_path.display(), "SVG written");

    if json {
        let json_path = dir.join(format!("{}.json", stem));
        tokio::fs::write(&json_path, serde_json::to_string_pretty(view)?).await?;
        debug!(path = %json_path.display(), "JSON written");
    }
    Ok(())
}
