//! samyoga - inspect the registration engine a configuration produces.
//!
//! Loads the registration settings, applies command line overrides through
//! the same control-panel path the interactive UI uses, builds the engine and
//! prints its parameters.
//!
//! # Usage
//!
//! ```bash
//! # With default config (samyoga.toml or /etc/samyoga.toml)
//! cargo run --release
//!
//! # With custom config file
//! cargo run --release -- --config samyoga.toml
//!
//! # With command line overrides
//! cargo run --release -- --method NDT_OMP --resolution 1.5 --json
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use samyoga::{
    PanelEdit, Registration, RegistrationMethod, RegistrationSelector, SamyogaConfig,
    ScriptedPanel,
};

#[derive(Parser, Debug)]
#[command(name = "samyoga", about = "Build and inspect a scan-matching registration engine")]
struct Args {
    /// Configuration file (default: samyoga.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registration method override
    #[arg(short, long, value_enum)]
    method: Option<RegistrationMethod>,

    /// NDT voxel resolution override (meters)
    #[arg(short, long)]
    resolution: Option<f32>,

    /// Transformation epsilon override
    #[arg(short, long)]
    epsilon: Option<f32>,

    /// Maximum iterations override
    #[arg(short = 'i', long)]
    max_iterations: Option<u32>,

    /// Print engine parameters as JSON
    #[arg(long)]
    json: bool,

    /// Write the resulting settings back to this TOML file
    #[arg(long)]
    save: Option<PathBuf>,
}

impl Args {
    /// Overrides expressed as control-panel edits.
    fn panel(&self) -> ScriptedPanel {
        let mut panel = ScriptedPanel::new();
        if let Some(method) = self.method {
            panel.queue("Method", PanelEdit::Select(method.index()));
        }
        if let Some(resolution) = self.resolution {
            panel.queue("Resolution", PanelEdit::Float(resolution));
        }
        if let Some(epsilon) = self.epsilon {
            panel.queue("Transformation epsilon", PanelEdit::Float(epsilon));
        }
        if let Some(iterations) = self.max_iterations {
            panel.queue("Max iterations", PanelEdit::Int(iterations));
        }
        panel
    }
}

fn load_config(args: &Args) -> Result<SamyogaConfig, samyoga::ConfigLoadError> {
    match &args.config {
        Some(path) => SamyogaConfig::load(path),
        None => SamyogaConfig::load_default(),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(args)?;
    let mut state = config.selector_state();
    let selector = RegistrationSelector::new();

    let mut panel = args.panel();
    selector.render_controls(&mut state, &mut panel);
    // Resolution stays queued when the chosen method hides its slider.
    if panel.pending() > 0 {
        log::warn!(
            "{} override(s) ignored for {}",
            panel.pending(),
            selector.resolve_method(&state)
        );
    }

    let engine = selector.build_engine(&state);
    let params = engine.params();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&params)?);
    } else {
        let method = params.method;
        println!("method:                    {} ({})", method, method.description());
        println!("transformation_epsilon:    {:.6}", params.transformation_epsilon);
        println!("maximum_iterations:        {}", params.maximum_iterations);
        if let Some(resolution) = params.resolution {
            println!("resolution:                {}", resolution);
        }
        if let Some(threads) = params.num_threads {
            println!("num_threads:               {} ({} available)", threads, threads.resolve());
        }
        if let Some(k) = params.correspondence_randomness {
            println!("correspondence_randomness: {}", k);
        }
    }

    if let Some(path) = &args.save {
        config.update_from_state(&state);
        config.save(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
