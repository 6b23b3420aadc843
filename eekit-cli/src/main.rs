//! eekit CLI - electronics engineering calculators and AI parts assistant.

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use eekit::ai::{
    AiError, Assistant, GeminiClient, ImagePart, ImageTask, SearchHit, SolutionOutcome,
};
use eekit::calculators::{
    AdcInput, DacInput, DividerInput, FrequencyUnit, I2cBusMode, I2cPullupInput, LcInput,
    LedInput, MicrostripInput, PowerModule, RcInput, WaveInput,
};
use eekit::reference::{Interface, SensorCategory};
use eekit::state::Settings;
use eekit::{AppState, Calculation, Dimension, ESeries, KvStore, Reading, ToolboxCore, ToolboxError};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eekit")]
#[command(about = "Electronics engineering toolbox: calculators, part codes and an AI assistant", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (stateful commands default to the saved output_format setting)
    #[arg(short, long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Path of the state database
    #[arg(long, env = "EEKIT_STORE", global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Gemini API key for the `ai` commands
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Voltage divider: bottom resistor for a target output, snapped to E24
    Divider {
        /// Supply voltage (V)
        #[arg(long)]
        vin: f64,
        /// Target output voltage (V)
        #[arg(long)]
        vout: f64,
        /// Top resistor (Ω)
        #[arg(long, default_value_t = 10_000.0)]
        r1: f64,
    },

    /// LED series resistor
    Led {
        /// Supply voltage (V)
        #[arg(long)]
        supply: f64,
        /// LED forward voltage (V)
        #[arg(long)]
        forward: f64,
        /// LED current (mA)
        #[arg(long, default_value_t = 20.0)]
        current_ma: f64,
    },

    /// RC low-pass cutoff frequency
    Rc {
        /// Resistance (Ω)
        #[arg(long)]
        r: f64,
        /// Capacitance (nF)
        #[arg(long)]
        c_nf: f64,
    },

    /// LC resonant frequency
    Lc {
        /// Inductance (µH)
        #[arg(long)]
        l_uh: f64,
        /// Capacitance (nF)
        #[arg(long)]
        c_nf: f64,
    },

    /// Period and free-space wavelength of a frequency
    Wave {
        frequency: f64,
        #[arg(long, default_value = "MHz")]
        unit: FrequencyUnit,
    },

    /// ADC code for an input voltage (metrics only without --vin)
    Adc {
        #[arg(long, default_value_t = 12)]
        bits: u32,
        #[arg(long, default_value_t = 3.3)]
        vref: f64,
        #[arg(long)]
        vin: Option<f64>,
    },

    /// DAC output voltage for a code
    Dac {
        #[arg(long, default_value_t = 12)]
        bits: u32,
        #[arg(long, default_value_t = 3.3)]
        vref: f64,
        #[arg(long)]
        code: u64,
    },

    /// Microstrip characteristic impedance (IPC-2141)
    Trace {
        /// Trace width (mm)
        #[arg(long)]
        width: Option<f64>,
        /// Dielectric height (mm)
        #[arg(long)]
        height: Option<f64>,
        /// Copper thickness (mm)
        #[arg(long)]
        thickness: Option<f64>,
        /// Relative permittivity
        #[arg(long)]
        er: Option<f64>,
    },

    /// Power budget over modules with duty cycles
    Power {
        /// Module as NAME:VOLTS:MILLIAMPS[:DUTY%], repeatable
        #[arg(long = "module", value_name = "SPEC", required = true)]
        modules: Vec<String>,
        /// Battery capacity for a runtime estimate (mAh)
        #[arg(long)]
        battery_mah: Option<f64>,
    },

    /// I2C pull-up resistor range
    I2c {
        #[arg(long, default_value_t = 3.3)]
        vdd: f64,
        /// Total bus capacitance (pF)
        #[arg(long, default_value_t = 100.0)]
        cap_pf: f64,
        #[arg(long, default_value = "standard")]
        mode: I2cBusMode,
    },

    /// Nearest standard resistor value
    Snap {
        value: f64,
        #[arg(long, default_value = "E24")]
        series: ESeries,
    },

    /// Unit conversion within one dimension
    Convert {
        value: f64,
        /// Capacitance, Voltage, Current, Inductance, Resistance or Power
        dimension: String,
        from: String,
        to: String,
    },

    /// Decode a 3 or 4 digit SMD marking
    Smd { code: String },

    /// Show a number in decimal, hexadecimal and binary
    Radix {
        literal: String,
        /// Base of the input literal: 2, 10 or 16
        #[arg(long, default_value_t = 10)]
        base: u32,
    },

    /// Quick-reference tables
    Ref {
        #[command(subcommand)]
        topic: RefTopic,
    },

    /// AI assistant (uses credits)
    Ai {
        #[command(subcommand)]
        action: AiCommand,
    },

    /// Show or top up the credit balance
    Credits {
        #[arg(long)]
        add: Option<u32>,
    },

    /// Recent AI results, newest first
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Saved components and news items
    Favorites,

    /// Ticker watch list
    Watch {
        #[command(subcommand)]
        action: WatchCommand,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum RefTopic {
    /// Serial bus pinouts and tips
    Interface { name: Option<Interface> },
    /// Common sensors by category
    Sensors { category: Option<SensorCategory> },
}

#[derive(Subcommand)]
enum AiCommand {
    /// Analyze a photo of a part, schematic, waveform or PCB
    Image {
        path: PathBuf,
        #[arg(long, default_value = "component-recognition")]
        task: ImageTask,
    },
    /// Ask the field application engineer
    Chat {
        query: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Structured component search
    Search {
        query: String,
        /// Add complete results to favorites
        #[arg(long)]
        save: bool,
    },
    /// Generate a hardware solution with BOM
    Solution { requirement: String },
    /// Discuss a news item
    News {
        query: String,
        /// News text the discussion is about
        #[arg(long)]
        context: String,
    },
}

#[derive(Subcommand)]
enum WatchCommand {
    Add { symbol: String },
    Remove { symbol: String },
    List,
}

#[derive(Subcommand)]
enum ConfigCommand {
    Show,
    Set { key: String, value: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

/// Options shared by the stateful commands.
struct GlobalOpts {
    format: Option<OutputFormat>,
    store: Option<PathBuf>,
    api_key: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = GlobalOpts {
        format: cli.format,
        store: cli.store,
        api_key: cli.api_key,
    };
    let calc_format = ctx.format.unwrap_or(OutputFormat::Human);

    let exit_code = match cli.command {
        Commands::Divider { vin, vout, r1 } => {
            handle_calculation(Calculation::Divider(DividerInput { vin, vout, r1 }), calc_format)
        }
        Commands::Led {
            supply,
            forward,
            current_ma,
        } => handle_calculation(
            Calculation::Led(LedInput {
                supply_v: supply,
                forward_v: forward,
                current_ma,
            }),
            calc_format,
        ),
        Commands::Rc { r, c_nf } => handle_calculation(
            Calculation::Rc(RcInput {
                resistance: r,
                capacitance_nf: c_nf,
            }),
            calc_format,
        ),
        Commands::Lc { l_uh, c_nf } => handle_calculation(
            Calculation::Lc(LcInput {
                inductance_uh: l_uh,
                capacitance_nf: c_nf,
            }),
            calc_format,
        ),
        Commands::Wave { frequency, unit } => {
            handle_calculation(Calculation::Wave(WaveInput { frequency, unit }), calc_format)
        }
        Commands::Adc { bits, vref, vin } => {
            let calc = match vin {
                Some(vin) => Calculation::Adc(AdcInput { bits, vref, vin }),
                None => Calculation::AdcMetrics { bits, vref },
            };
            handle_calculation(calc, calc_format)
        }
        Commands::Dac { bits, vref, code } => {
            handle_calculation(Calculation::Dac(DacInput { bits, vref, code }), calc_format)
        }
        Commands::Trace {
            width,
            height,
            thickness,
            er,
        } => {
            let defaults = MicrostripInput::default();
            let input = MicrostripInput {
                width_mm: width.unwrap_or(defaults.width_mm),
                height_mm: height.unwrap_or(defaults.height_mm),
                thickness_mm: thickness.unwrap_or(defaults.thickness_mm),
                er: er.unwrap_or(defaults.er),
            };
            handle_calculation(Calculation::Microstrip(input), calc_format)
        }
        Commands::Power {
            modules,
            battery_mah,
        } => match modules.iter().map(|m| parse_module(m)).collect::<Result<Vec<_>>>() {
            Ok(modules) => handle_calculation(
                Calculation::PowerBudget {
                    modules,
                    battery_mah,
                },
                calc_format,
            ),
            Err(e) => report(Err(e)),
        },
        Commands::I2c { vdd, cap_pf, mode } => handle_calculation(
            Calculation::I2cPullup(I2cPullupInput {
                vdd,
                bus_capacitance_pf: cap_pf,
                mode,
            }),
            calc_format,
        ),
        Commands::Snap { value, series } => handle_calculation(
            Calculation::Snap {
                target: value,
                series,
            },
            calc_format,
        ),
        Commands::Convert {
            value,
            dimension,
            from,
            to,
        } => match dimension.parse::<Dimension>() {
            Ok(dimension) => handle_calculation(
                Calculation::Convert {
                    value,
                    dimension,
                    from,
                    to,
                },
                calc_format,
            ),
            Err(e) => report(Err(e.into())),
        },
        Commands::Smd { code } => handle_calculation(Calculation::Smd { code }, calc_format),
        Commands::Radix { literal, base } => {
            handle_calculation(Calculation::Radix { literal, base }, calc_format)
        }
        Commands::Ref { topic } => report(handle_reference(topic, calc_format)),
        Commands::Ai { action } => report(handle_ai(&ctx, action)),
        Commands::Credits { add } => report(handle_credits(&ctx, add)),
        Commands::History { limit } => report(handle_history(&ctx, limit)),
        Commands::Favorites => report(handle_favorites(&ctx)),
        Commands::Watch { action } => report(handle_watch(&ctx, action)),
        Commands::Config { action } => report(handle_config(&ctx, action)),
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report(result: Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    }
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

/// Invalid numeric input shows the `--` placeholder and still exits 0.
/// Unknown units are a usage error.
fn handle_calculation(calc: Calculation, format: OutputFormat) -> i32 {
    let (output, readings, error) = match ToolboxCore::evaluate(&calc) {
        Ok(output) => {
            let readings = output.readings();
            (Some(output), readings, None)
        }
        Err(ToolboxError::UnknownUnitOrDimension(what)) => {
            eprintln!("Error: unknown unit or dimension: {}", what);
            return 1;
        }
        Err(e) => {
            tracing::debug!("{} rejected: {}", calc.title(), e);
            (None, vec![Reading::missing(calc.title())], Some(e.to_string()))
        }
    };

    match format {
        OutputFormat::Human => {
            println!("{}", calc.title());
            print_readings(&readings);
            if let Some(error) = &error {
                eprintln!("note: {}", error);
            }
            0
        }
        OutputFormat::Json => {
            let value = json!({
                "calculation": calc,
                "output": output,
                "readings": readings,
                "error": error,
            });
            report(print_json(&value))
        }
    }
}

fn print_readings(readings: &[Reading]) {
    let width = readings.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
    for reading in readings {
        println!("  {:<width$}  {}", reading.label, reading.value, width = width);
    }
}

fn parse_module(spec: &str) -> Result<PowerModule> {
    let parts: Vec<&str> = spec.split(':').map(str::trim).collect();
    if !(3..=4).contains(&parts.len()) || parts[0].is_empty() {
        bail!("module must look like NAME:VOLTS:MILLIAMPS[:DUTY%], got '{}'", spec);
    }
    let number = |field: &str, text: &str| -> Result<f64> {
        text.parse::<f64>()
            .with_context(|| format!("invalid {} '{}' in module '{}'", field, text, spec))
    };
    let voltage = number("voltage", parts[1])?;
    let current_ma = number("current", parts[2])?;
    let duty = match parts.get(3) {
        Some(text) => number("duty", text)?,
        None => 100.0,
    };
    Ok(PowerModule::new(parts[0], voltage, current_ma, duty))
}

fn handle_reference(topic: RefTopic, format: OutputFormat) -> Result<()> {
    match topic {
        RefTopic::Interface { name } => {
            let interfaces: Vec<Interface> = match name {
                Some(interface) => vec![interface],
                None => Interface::ALL.to_vec(),
            };
            let infos: Vec<_> = interfaces.iter().map(Interface::info).collect();
            match format {
                OutputFormat::Json => print_json(&serde_json::to_value(&infos)?)?,
                OutputFormat::Human => {
                    for info in &infos {
                        println!("{}", info.interface);
                        println!("  Pins:  {}", info.pins.join(", "));
                        println!("  Speed: {}", info.speed);
                        println!("  Tips:  {}", info.tips);
                    }
                }
            }
        }
        RefTopic::Sensors { category } => {
            let categories: Vec<SensorCategory> = match category {
                Some(category) => vec![category],
                None => SensorCategory::ALL.to_vec(),
            };
            match format {
                OutputFormat::Json => {
                    let value: Vec<Value> = categories
                        .iter()
                        .map(|c| json!({ "category": c, "sensors": c.sensors() }))
                        .collect();
                    print_json(&Value::Array(value))?;
                }
                OutputFormat::Human => {
                    for category in &categories {
                        println!("{}", category);
                        for s in category.sensors() {
                            println!(
                                "  {:<14} {:<20} {:<16} {}",
                                s.name, s.range, s.typical, s.key_spec
                            );
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Stateful commands
// ---------------------------------------------------------------------------

struct Session {
    store: KvStore,
    state: AppState,
}

impl Session {
    fn open(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => default_store_path()?,
        };
        tracing::debug!("Opening store at {}", path.display());
        let store = KvStore::open(&path)
            .with_context(|| format!("failed to open store at {}", path.display()))?;
        let state = AppState::load(&store).context("failed to load saved state")?;
        Ok(Self { store, state })
    }

    fn save(&self) -> Result<()> {
        self.state.save(&self.store).context("failed to save state")
    }

    fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.unwrap_or_else(|| saved_format(&self.state.settings))
    }
}

fn default_store_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "eekit")
        .context("no data directory available; pass --store")?;
    Ok(dirs.data_dir().join("eekit.db"))
}

fn saved_format(settings: &Settings) -> OutputFormat {
    if settings.output_format == "json" {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    }
}

fn handle_credits(ctx: &GlobalOpts, add: Option<u32>) -> Result<()> {
    let mut session = Session::open(ctx.store.as_deref())?;
    if let Some(amount) = add {
        session.state.add_credits(amount);
        session.save()?;
        tracing::info!("Added {} credits", amount);
    }

    let account = &session.state.account;
    match session.format(ctx.format) {
        OutputFormat::Json => print_json(&serde_json::to_value(account)?)?,
        OutputFormat::Human => {
            println!("Credits: {}", account.credits);
            println!("Used:    {}", account.total_usage);
            println!("Tier:    {:?}", account.tier);
        }
    }
    Ok(())
}

fn handle_history(ctx: &GlobalOpts, limit: usize) -> Result<()> {
    let session = Session::open(ctx.store.as_deref())?;
    let items: Vec<_> = session.state.history.iter().take(limit).collect();
    match session.format(ctx.format) {
        OutputFormat::Json => print_json(&serde_json::to_value(&items)?)?,
        OutputFormat::Human => {
            if items.is_empty() {
                println!("No history yet");
            }
            for item in items {
                println!(
                    "[{}] {:?} {}",
                    item.timestamp.format("%Y-%m-%d %H:%M"),
                    item.kind,
                    item.task
                );
            }
        }
    }
    Ok(())
}

fn handle_favorites(ctx: &GlobalOpts) -> Result<()> {
    let session = Session::open(ctx.store.as_deref())?;
    let state = &session.state;
    match session.format(ctx.format) {
        OutputFormat::Json => print_json(&json!({
            "components": state.component_favorites,
            "news": state.news_favorites,
        }))?,
        OutputFormat::Human => {
            println!("Components ({})", state.component_favorites.len());
            for c in &state.component_favorites {
                println!("  {} ({}) {}", c.name, c.manufacturer, c.description);
            }
            println!("News ({})", state.news_favorites.len());
            for n in &state.news_favorites {
                println!("  {} [{}]", n.title, n.category);
            }
        }
    }
    Ok(())
}

fn handle_watch(ctx: &GlobalOpts, action: WatchCommand) -> Result<()> {
    let mut session = Session::open(ctx.store.as_deref())?;
    match action {
        WatchCommand::Add { symbol } => {
            if !session.state.watch(&symbol) {
                bail!("'{}' is blank or already watched", symbol.trim());
            }
            session.save()?;
        }
        WatchCommand::Remove { symbol } => {
            if !session.state.unwatch(&symbol) {
                bail!("'{}' is not on the watch list", symbol.trim());
            }
            session.save()?;
        }
        WatchCommand::List => {}
    }

    match session.format(ctx.format) {
        OutputFormat::Json => print_json(&serde_json::to_value(&session.state.watchlist)?)?,
        OutputFormat::Human => {
            for symbol in &session.state.watchlist {
                println!("{}", symbol);
            }
        }
    }
    Ok(())
}

fn handle_config(ctx: &GlobalOpts, action: ConfigCommand) -> Result<()> {
    let mut session = Session::open(ctx.store.as_deref())?;
    if let ConfigCommand::Set { key, value } = &action {
        session.state.settings.set(key, value)?;
        session.save()?;
    }

    let settings = &session.state.settings;
    match session.format(ctx.format) {
        OutputFormat::Json => print_json(&serde_json::to_value(settings)?)?,
        OutputFormat::Human => {
            for key in Settings::KEYS {
                println!("{} = {}", key, settings.get(key).unwrap_or_default());
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// AI
// ---------------------------------------------------------------------------

enum Answer {
    Text(String),
    Hits(Vec<SearchHit>),
    Solution(SolutionOutcome),
}

/// An AI command with its input files already read.
enum Job {
    Image(ImagePart, ImageTask),
    Chat(String, Option<ImagePart>),
    Search(String),
    Solution(String),
    News(String, String),
}

fn read_image(path: &Path) -> Result<ImagePart> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read image {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str());
    Ok(ImagePart::from_extension(data, extension))
}

fn handle_ai(ctx: &GlobalOpts, action: AiCommand) -> Result<()> {
    let mut session = Session::open(ctx.store.as_deref())?;
    let format = session.format(ctx.format);

    let api_key = ctx
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!(AiError::MissingApiKey.user_message()))?;

    // Input files are read before any credits are spent.
    let (job, save_hits) = match action {
        AiCommand::Image { path, task } => (Job::Image(read_image(&path)?, task), false),
        AiCommand::Chat { query, image } => {
            let image = image.as_deref().map(read_image).transpose()?;
            (Job::Chat(query, image), false)
        }
        AiCommand::Search { query, save } => (Job::Search(query), save),
        AiCommand::Solution { requirement } => (Job::Solution(requirement), false),
        AiCommand::News { query, context } => (Job::News(query, context), false),
    };

    let client = GeminiClient::with_config(api_key, session.state.settings.gemini_config());
    let assistant = Assistant::new(Arc::new(client));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let state = &mut session.state;
    let answer = runtime.block_on(async move {
        match job {
            Job::Image(image, task) => assistant
                .analyze_image(state, image, task.title(), task.instruction())
                .await
                .map(Answer::Text),
            Job::Chat(query, image) => assistant.chat(state, &query, image).await.map(Answer::Text),
            Job::Search(query) => assistant
                .deep_component_search(state, &query)
                .await
                .map(Answer::Hits),
            Job::Solution(requirement) => assistant
                .generate_hardware_solution(state, &requirement)
                .await
                .map(Answer::Solution),
            Job::News(query, context) => assistant
                .discuss_news(state, &query, &context)
                .await
                .map(Answer::Text),
        }
    });

    let answer = match answer {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!("AI request failed: {}", e);
            bail!("{}", e.user_message());
        }
    };

    if let (Answer::Hits(hits), true) = (&answer, save_hits) {
        for hit in hits {
            if let SearchHit::Complete(record) = hit {
                if !session.state.is_component_favorite(&record.id) {
                    session.state.toggle_component_favorite(record.clone());
                }
            }
        }
    }
    session.save()?;

    match format {
        OutputFormat::Json => {
            let answer = match &answer {
                Answer::Text(text) => json!({ "answer": text }),
                Answer::Hits(hits) => json!({ "components": hits }),
                Answer::Solution(solution) => json!({ "solution": solution }),
            };
            print_json(&json!({
                "result": answer,
                "credits": session.state.credits(),
            }))?;
        }
        OutputFormat::Human => {
            print_answer(&answer);
            eprintln!("Credits remaining: {}", session.state.credits());
        }
    }
    Ok(())
}

fn print_answer(answer: &Answer) {
    match answer {
        Answer::Text(text) => println!("{}", text),
        Answer::Hits(hits) => {
            if hits.is_empty() {
                println!("No components found");
            }
            for hit in hits {
                match hit {
                    SearchHit::Complete(c) => {
                        println!("{} ({})", c.name, c.manufacturer);
                        println!("  {}", c.description);
                        for (key, value) in &c.specs {
                            println!("  {:<10} {}", key, value);
                        }
                        if let Some(url) = &c.datasheet_insights.datasheet_url {
                            println!("  Datasheet: {}", url);
                        }
                    }
                    SearchHit::Partial { name, missing, .. } => {
                        println!(
                            "{} (incomplete answer, missing: {})",
                            name.as_deref().unwrap_or(eekit::SENTINEL),
                            missing.join(", ")
                        );
                    }
                }
            }
        }
        Answer::Solution(SolutionOutcome::Complete(solution)) => {
            println!("{}", solution.summary());
            if !solution.modules.is_empty() {
                println!("\nModules: {}", solution.modules.join(", "));
            }
            println!("\nBOM:");
            for line in &solution.bom {
                println!(
                    "  {:<20} {:<16} {:<24} {}",
                    line.mpn,
                    line.mfg,
                    line.func,
                    line.price.as_deref().unwrap_or(eekit::SENTINEL)
                );
            }
            let score = |s: Option<u8>| s.map(|v| v.to_string()).unwrap_or_else(|| eekit::SENTINEL.to_string());
            println!(
                "\nPerformance {} / Cost {} / Availability {}",
                score(solution.analysis.performance),
                score(solution.analysis.cost),
                score(solution.analysis.availability)
            );
            if !solution.analysis.tradeoff.is_empty() {
                println!("{}", solution.analysis.tradeoff);
            }
        }
        Answer::Solution(SolutionOutcome::Partial { missing, .. }) => {
            println!("The AI returned an incomplete solution (missing: {})", missing.join(", "));
        }
    }
}
