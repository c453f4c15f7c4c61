use anyhow::{bail, Context, Result};
use c2c_chart::config::{self, ExportKind};
use c2c_chart::instructions::{self, LegendOrder};
use c2c_chart::{printable, render, text};
use c2c_chart::{CellCoord, ChartOptions, Color, ExportRecord, Grid, YarnWeight, PALETTE};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "c2c-chart",
    version,
    about = "Design C2C crochet charts and export pattern files, chart images and written rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print supported commands in JSON
    Commands,
    /// Print the paint palette and yarn weights in JSON
    Palette,
    /// Create a blank pattern file
    New(NewArgs),
    /// Replace a pattern's grid with a blank grid of a new size
    Resize(ResizeArgs),
    /// Reset every cell of a pattern to background
    Clear(ClearArgs),
    /// Paint cells of a pattern with one color
    Paint(PaintArgs),
    /// Build a pattern by sampling a raster image into the grid
    Import(ImportArgs),
    /// Render the chart as a PNG image
    Render(RenderArgs),
    /// Write row-by-row C2C instructions
    Instructions(InstructionsArgs),
    /// Write a printable HTML chart with color key
    Printable(PrintableArgs),
}

#[derive(Args, Debug)]
struct NewArgs {
    /// Grid width in blocks (1-40; invalid input is corrected)
    #[arg(long, default_value = "20")]
    width: String,
    /// Grid height in blocks (1-40; invalid input is corrected)
    #[arg(long, default_value = "20")]
    height: String,
    /// Yarn weight: thread, fine, light, medium, bulky, super-bulky
    #[arg(long, default_value_t = YarnWeight::Medium)]
    yarn: YarnWeight,
    /// Output pattern JSON path (default: $C2C_OUT_DIR/c2c-chart-<yarn>.json)
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ResizeArgs {
    /// Pattern JSON path
    pattern: PathBuf,
    #[arg(long)]
    width: String,
    #[arg(long)]
    height: String,
    /// Change the yarn weight at the same time
    #[arg(long)]
    yarn: Option<YarnWeight>,
}

#[derive(Args, Debug)]
struct ClearArgs {
    /// Pattern JSON path
    pattern: PathBuf,
}

#[derive(Args, Debug)]
struct PaintArgs {
    /// Pattern JSON path
    pattern: PathBuf,
    /// Palette name (e.g. red, dark-green) or #RRGGBB
    #[arg(long)]
    color: Option<String>,
    /// Zero-based ROW,COL of a cell to paint (repeatable)
    #[arg(long = "cell", value_parser = parse_cell, required = true)]
    cells: Vec<CellCoord>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Source image (PNG, JPEG or GIF)
    image: PathBuf,
    #[arg(long, default_value = "20")]
    width: String,
    #[arg(long, default_value = "20")]
    height: String,
    #[arg(long, default_value_t = YarnWeight::Medium)]
    yarn: YarnWeight,
    /// Output pattern JSON path
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Hide row/column numbers
    #[arg(long, action = ArgAction::SetTrue)]
    no_numbers: bool,
    /// Hide the alternating diagonal bands
    #[arg(long, action = ArgAction::SetTrue)]
    no_guides: bool,
    /// Block size in pixels
    #[arg(
        long,
        default_value_t = config::DEFAULT_CELL_SIZE,
        value_parser = clap::value_parser!(u32).range(4..=100)
    )]
    cell_size: u32,
}

impl ChartArgs {
    fn options(&self) -> ChartOptions {
        ChartOptions {
            cell_size: self.cell_size,
            show_numbers: !self.no_numbers,
            show_guides: !self.no_guides,
        }
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Pattern JSON path
    pattern: PathBuf,
    /// Output PNG path (default: $C2C_OUT_DIR/c2c-chart-<yarn>.png)
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LegendOrderArg {
    GridScan,
    DiagonalWalk,
}

impl From<LegendOrderArg> for LegendOrder {
    fn from(value: LegendOrderArg) -> Self {
        match value {
            LegendOrderArg::GridScan => LegendOrder::GridScan,
            LegendOrderArg::DiagonalWalk => LegendOrder::DiagonalWalk,
        }
    }
}

#[derive(Args, Debug)]
struct InstructionsArgs {
    /// Pattern JSON path
    pattern: PathBuf,
    /// Output path, or - for stdout (default: $C2C_OUT_DIR/c2c-instructions-<yarn>.txt)
    #[arg(long)]
    out: Option<String>,
    /// Emit structured rows and legend as JSON instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    /// How color numbers are assigned
    #[arg(long, value_enum, default_value_t = LegendOrderArg::GridScan)]
    legend_order: LegendOrderArg,
}

#[derive(Args, Debug)]
struct PrintableArgs {
    /// Pattern JSON path
    pattern: PathBuf,
    /// Output HTML path (default: $C2C_OUT_DIR/c2c-chart-<yarn>.html)
    #[arg(long)]
    out: Option<PathBuf>,
    #[command(flatten)]
    chart: ChartArgs,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Commands => print_commands(),
        Commands::Palette => print_palette(),
        Commands::New(args) => command_new(args),
        Commands::Resize(args) => command_resize(args),
        Commands::Clear(args) => command_clear(args),
        Commands::Paint(args) => command_paint(args),
        Commands::Import(args) => command_import(args),
        Commands::Render(args) => command_render(args),
        Commands::Instructions(args) => command_instructions(args),
        Commands::Printable(args) => command_printable(args),
    }
}

fn print_commands() -> Result<()> {
    let rows = vec![
        json!({"name": "palette", "description": "List paint colors and yarn weights."}),
        json!({"name": "new", "description": "Create a blank pattern file."}),
        json!({
            "name": "resize",
            "description": "Replace the grid with a blank grid of a new size."
        }),
        json!({"name": "clear", "description": "Reset every cell to background."}),
        json!({"name": "paint", "description": "Paint cells with a palette or hex color."}),
        json!({"name": "import", "description": "Sample a raster image into a new pattern."}),
        json!({
            "name": "render",
            "description": "Render the chart as PNG with numbers and diagonal guides."
        }),
        json!({
            "name": "instructions",
            "description": "Write row-by-row C2C instructions (text or JSON)."
        }),
        json!({"name": "printable", "description": "Write a printable HTML chart with color key."}),
    ];

    println!(
        "{}",
        serde_json::to_string_pretty(&json!({ "commands": rows }))?
    );
    Ok(())
}

fn print_palette() -> Result<()> {
    let colors: Vec<Value> = PALETTE
        .iter()
        .map(|entry| json!({"name": entry.name, "hex": entry.color.to_hex()}))
        .collect();
    let yarns: Vec<Value> = YarnWeight::ALL
        .iter()
        .map(|yarn| json!({"id": yarn.id(), "name": yarn.display_name()}))
        .collect();
    let payload = json!({
        "colors": colors,
        "background": Color::BACKGROUND.to_hex(),
        "default_color": config::DEFAULT_PAINT_COLOR.to_hex(),
        "yarn_weights": yarns,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn command_new(args: NewArgs) -> Result<()> {
    let dims = config::parse_dimensions(&args.width, &args.height);
    let grid = Grid::new(dims);
    let out = args
        .out
        .unwrap_or_else(|| ExportKind::Pattern.default_path(args.yarn));
    save_pattern(&out, &ExportRecord::snapshot(&grid, args.yarn))?;
    println!("{}", abs_path(&out).display());
    Ok(())
}

fn command_resize(args: ResizeArgs) -> Result<()> {
    let record = load_pattern(&args.pattern)?;
    let mut grid = record.to_grid()?;
    let dims = config::parse_dimensions(&args.width, &args.height);
    grid.resize(dims.width as i64, dims.height as i64);
    let yarn = args.yarn.unwrap_or(record.yarn_type());
    save_pattern(&args.pattern, &ExportRecord::snapshot(&grid, yarn))?;
    println!("{}", abs_path(&args.pattern).display());
    Ok(())
}

fn command_clear(args: ClearArgs) -> Result<()> {
    let record = load_pattern(&args.pattern)?;
    let mut grid = record.to_grid()?;
    grid.clear();
    save_pattern(&args.pattern, &ExportRecord::snapshot(&grid, record.yarn_type()))?;
    println!("{}", abs_path(&args.pattern).display());
    Ok(())
}

fn command_paint(args: PaintArgs) -> Result<()> {
    let color = match args.color.as_deref() {
        Some(raw) => Color::parse_named(raw)
            .with_context(|| format!("unknown color {raw:?}; use a palette name or #RRGGBB"))?,
        None => config::DEFAULT_PAINT_COLOR,
    };

    let record = load_pattern(&args.pattern)?;
    let mut grid = record.to_grid()?;
    let (painted, skipped) = apply_paint(&mut grid, color, &args.cells);
    save_pattern(&args.pattern, &ExportRecord::snapshot(&grid, record.yarn_type()))?;

    let payload = json!({
        "pattern": abs_path(&args.pattern).display().to_string(),
        "color": color.to_hex(),
        "painted": painted,
        "skipped": skipped,
    });
    println!("{}", serde_json::to_string(&payload)?);
    Ok(())
}

/// Out-of-range cells are logged and skipped; the rest are still painted.
fn apply_paint(grid: &mut Grid, color: Color, cells: &[CellCoord]) -> (usize, usize) {
    let mut painted = 0;
    let mut skipped = 0;
    for cell in cells {
        match grid.set_cell(cell.row, cell.col, color) {
            Ok(()) => painted += 1,
            Err(err) => {
                log::warn!("{err}; skipping");
                skipped += 1;
            }
        }
    }
    (painted, skipped)
}

fn command_import(args: ImportArgs) -> Result<()> {
    if !args.image.exists() {
        bail!("image not found: {}", args.image.display());
    }
    let bytes = fs::read(&args.image)
        .with_context(|| format!("failed to read image: {}", args.image.display()))?;
    let dims = config::parse_dimensions(&args.width, &args.height);
    let mut grid = Grid::new(dims);
    grid.import_image(&bytes)
        .with_context(|| format!("failed to import image: {}", args.image.display()))?;

    let out = args
        .out
        .unwrap_or_else(|| ExportKind::Pattern.default_path(args.yarn));
    save_pattern(&out, &ExportRecord::snapshot(&grid, args.yarn))?;
    println!("{}", abs_path(&out).display());
    Ok(())
}

fn command_render(args: RenderArgs) -> Result<()> {
    let record = load_pattern(&args.pattern)?;
    let grid = record.to_grid()?;
    let png = render::render_png(&grid, &args.chart.options())?;
    let out = args
        .out
        .unwrap_or_else(|| ExportKind::Chart.default_path(record.yarn_type()));
    ensure_parent_dir(&out)?;
    fs::write(&out, png).with_context(|| format!("failed to save chart image: {}", out.display()))?;
    println!("{}", abs_path(&out).display());
    Ok(())
}

fn command_instructions(args: InstructionsArgs) -> Result<()> {
    let record = load_pattern(&args.pattern)?;
    let order: LegendOrder = args.legend_order.into();

    let body = if args.json {
        let generated = instructions::generate_with(&record.to_grid()?, order);
        let legend: Vec<Value> = generated
            .legend
            .entries()
            .iter()
            .map(|entry| {
                json!({"color": entry.color, "label": entry.label(), "ordinal": entry.ordinal})
            })
            .collect();
        let payload = json!({
            "size": record.size(),
            "yarnType": record.yarn_type(),
            "legend": legend,
            "rows": generated.rows,
        });
        serde_json::to_string_pretty(&payload)? + "\n"
    } else {
        text::written_instructions(&record, order)?
    };

    match args.out.as_deref() {
        Some("-") => {
            io::stdout()
                .write_all(body.as_bytes())
                .context("failed to write instructions to stdout")?;
        }
        other => {
            let out = other
                .map(PathBuf::from)
                .unwrap_or_else(|| ExportKind::Instructions.default_path(record.yarn_type()));
            write_text_file(&out, &body)?;
            println!("{}", abs_path(&out).display());
        }
    }
    Ok(())
}

fn command_printable(args: PrintableArgs) -> Result<()> {
    let record = load_pattern(&args.pattern)?;
    let html = printable::printable_html(&record, &args.chart.options())?;
    let out = args
        .out
        .unwrap_or_else(|| ExportKind::Printable.default_path(record.yarn_type()));
    write_text_file(&out, &html)?;
    println!("{}", abs_path(&out).display());
    Ok(())
}

fn parse_cell(raw: &str) -> std::result::Result<CellCoord, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(format!("expected ROW,COL, got {raw:?}"));
    }
    let row = parts[0]
        .parse::<usize>()
        .map_err(|_| format!("invalid row in {raw:?}"))?;
    let col = parts[1]
        .parse::<usize>()
        .map_err(|_| format!("invalid column in {raw:?}"))?;
    Ok(CellCoord::new(row, col))
}

fn load_pattern(path: &Path) -> Result<ExportRecord> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read pattern file: {}", path.display()))?;
    let record = ExportRecord::from_json(&raw)
        .with_context(|| format!("invalid pattern file: {}", path.display()))?;
    log::debug!(
        "loaded {}x{} pattern from {}",
        record.size().width,
        record.size().height,
        path.display()
    );
    Ok(record)
}

fn save_pattern(path: &Path, record: &ExportRecord) -> Result<()> {
    write_text_file(path, &record.to_json_pretty()?)
}

fn write_text_file(path: &Path, content: &str) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).with_context(|| format!("failed to write file: {}", path.display()))?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create parent directory: {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn abs_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}
