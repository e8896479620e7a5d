use anyhow::{anyhow, Context, Result};
use clap::Parser;
use statescatter::criteria::{Axis, Column, Criteria};
use statescatter::csv_reader;
use statescatter::graph::{self, OutputFormat};
use statescatter::ir::Layout;
use statescatter::parser::parse_event_line;
use statescatter::runtime::ChartApp;
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "statescatter")]
#[command(about = "Render an interactive state-health scatter chart from CSV data", long_about = None)]
struct Args {
    #[arg(long = "data", default_value = "assets/data/data.csv", help = "CSV dataset path")]
    data: PathBuf,

    #[arg(long = "out", help = "Output file (.svg or .png); SVG on stdout when omitted")]
    out: Option<PathBuf>,

    #[arg(short = 'x', long = "x", default_value = "poverty", help = "Initial X-axis column")]
    x_column: String,

    #[arg(short = 'y', long = "y", default_value = "healthcareLow", help = "Initial Y-axis column")]
    y_column: String,

    #[arg(long = "events", help = "Event script to replay after the first render ('-' for stdin)")]
    events: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let criteria = Criteria::new(
        axis_column(Axis::X, &args.x_column)?,
        axis_column(Axis::Y, &args.y_column)?,
    );

    let data = csv_reader::load_dataset(&args.data).context("Failed to load data")?;
    let mut app = ChartApp::new(data, criteria, Layout::default());
    log::info!("Loaded {} records from {}", app.dataset().len(), args.data.display());

    app.render()?;
    if let Some(out) = &args.out {
        write_output(&app, out)?;
    }

    if let Some(source) = &args.events {
        let reader: Box<dyn BufRead> = if source == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let file = fs::File::open(source)
                .with_context(|| format!("Failed to open event script '{}'", source))?;
            Box::new(BufReader::new(file))
        };
        replay(&mut app, reader, args.out.as_deref())?;
    }

    if args.out.is_none() {
        let session = app.session().ok_or_else(|| anyhow!("No chart rendered"))?;
        let svg = graph::render_svg(session)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(svg.as_bytes())
            .context("Failed to write SVG to stdout")?;
        handle.flush().context("Failed to flush stdout")?;
    }

    Ok(())
}

/// Apply script events in order. Bad lines are logged and skipped.
fn replay(app: &mut ChartApp, reader: Box<dyn BufRead>, out: Option<&Path>) -> Result<()> {
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event script")?;
        let event = match parse_event_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("line {}: {:#}", line_no + 1, e);
                continue;
            }
        };

        if let Err(e) = app.dispatch(&event) {
            log::warn!("line {}: '{}' rejected: {:#}", line_no + 1, event, e);
            continue;
        }
        if let Some(out) = out {
            write_output(app, out)?;
        }
    }
    Ok(())
}

fn write_output(app: &ChartApp, out: &Path) -> Result<()> {
    let session = app.session().ok_or_else(|| anyhow!("No chart rendered"))?;
    let bytes = graph::render_session(session, OutputFormat::from_path(out))?;
    fs::write(out, bytes).with_context(|| format!("Failed to write '{}'", out.display()))?;
    log::info!("Wrote {} ({})", out.display(), session.criteria);
    Ok(())
}

fn axis_column(axis: Axis, key: &str) -> Result<Column> {
    let column = Column::from_key(key)?;
    if !axis.offers(column) {
        let offered: Vec<&str> = axis.selector_group().iter().map(|c| c.key()).collect();
        return Err(anyhow!(
            "Column '{}' is not selectable on the {} axis (choose from: {})",
            key,
            axis,
            offered.join(", ")
        ));
    }
    Ok(column)
}
