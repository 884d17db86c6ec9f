//! master-volume - Master volume panel with a perceptual slider curve

use anyhow::{bail, Result};
use clap::Parser;
use master_volume::audio::{AudioService, StateFileAudio};
use master_volume::config::{self, MasterVolumeConfig};
use master_volume::panel::{buttons, MasterVolumeOverlay, Overlay, Panel};
use master_volume::{logging, patch, viz};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match &cli.command {
        Commands::Show => {
            with_panel(&cli, |panel| {
                let audio = panel.audio().state();
                println!("Volume: {:.2}", panel.value());
                println!("  Slider position: {}", panel.slider_progress());
                println!("  Loaded from: {:?}", panel.origin());
                println!(
                    "  Range: {:.3} - {:.3} ({})",
                    panel.setting().curve().min(),
                    panel.setting().curve().max(),
                    panel.setting().curve().name()
                );
                println!("  Output target: {}", audio.target);
                Ok(())
            })?;
        }

        Commands::Set(args) => {
            with_panel(&cli, |panel| {
                if let Some(position) = args.position {
                    panel.on_slider_changed(position);
                } else if let Some(volume) = args.volume {
                    if !volume.is_finite() {
                        bail!("Volume must be a finite number");
                    }
                    panel.set_volume(volume);
                }
                let label = panel.update().to_string();
                println!("{}  (slider at {})", label, panel.slider_progress());
                Ok(())
            })?;
        }

        Commands::Reset => {
            with_panel(&cli, |panel| {
                panel.on_reset_click(buttons::A);
                let label = panel.update().to_string();
                println!("{}  (slider at {})", label, panel.slider_progress());
                Ok(())
            })?;
        }

        Commands::Speaker => {
            with_panel(&cli, |panel| {
                if !panel.on_force_speaker_click(buttons::A) {
                    bail!("This panel revision has no speaker switch");
                }
                println!("Output target: {}", panel.audio().state().target);
                Ok(())
            })?;
        }

        Commands::Panel => {
            with_panel(&cli, |panel| viz::run_panel(panel))?;
        }

        Commands::Curve { step } => {
            if *step == 0 {
                bail!("Step must be at least 1");
            }

            let cfg = resolve_config(&cli)?;
            let curve = cfg.curve.build();
            println!("Curve: {} ({:?}, exponent {})", curve.name(), cfg.curve.kind, cfg.curve.exponent);
            println!("  position  volume");
            for position in (0..=100u8).step_by(*step as usize) {
                println!("  {:>8}  {:.4}", position, curve.to_volume(position as f64));
            }
            if 100 % step != 0 {
                println!("  {:>8}  {:.4}", 100, curve.to_volume(100.0));
            }
        }

        Commands::Check => {
            println!("Checking configuration at {:?}...", cli.config);

            match config::load_config(&cli.config) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Curve: {:?}", cfg.curve.kind);
                    println!("  Range: {} - {}", cfg.curve.min, cfg.curve.max);
                    println!("  Exponent: {}", cfg.curve.exponent);
                    println!("  Default: {}", cfg.curve.default);
                    println!(
                        "  Persistence: {} ({:?})",
                        if cfg.storage.enabled { "enabled" } else { "disabled" },
                        cfg.storage.path
                    );
                    println!(
                        "  Speaker switch: {}",
                        if cfg.output.force_speaker { "shown" } else { "hidden" }
                    );
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../master-volume.example.yaml");

            if cli.config.exists() {
                println!("{:?} already exists. Not overwriting.", cli.config);
            } else {
                std::fs::write(&cli.config, example_config)?;
                println!("Created {:?} with example configuration.", cli.config);
            }
        }

        Commands::Patch { nso, out_dir } => {
            println!("Patching {:?}", nso);

            let (clamp, dest) = patch::write_patch(nso, out_dir.as_deref())?;
            println!("  Build id: {}", clamp.build_id);
            if let Some(name) = &clamp.module_name {
                println!("  Module name: {}", name);
            }
            println!("  Clamp at text offset {:#x}", clamp.text_offset);
            println!("Wrote {:?}", dest);
        }
    }

    Ok(())
}

/// Settings from the preset, or the config file, plus command-line overrides
fn resolve_config(cli: &Cli) -> Result<MasterVolumeConfig> {
    let mut cfg = match cli.preset {
        Some(preset) => MasterVolumeConfig::preset(preset),
        None => config::load_config_or_default(&cli.config)?,
    };

    if let Some(store) = &cli.store {
        cfg.storage.path = store.clone();
    }
    cfg.validate()?;

    Ok(cfg)
}

/// Run the overlay lifecycle around one panel session
fn with_panel<F>(cli: &Cli, action: F) -> Result<()>
where
    F: FnOnce(&mut Panel<StateFileAudio>) -> Result<()>,
{
    let cfg = resolve_config(cli)?;
    let audio = StateFileAudio::open(&cli.audio_state)?;
    log::debug!("audio state at {:?}", audio.path());

    let mut overlay = MasterVolumeOverlay::new(cfg, audio);
    overlay.init_services()?;
    overlay.on_show();

    let mut panel = overlay.load_initial_gui()?;
    let result = action(&mut panel);

    overlay.on_hide();
    overlay.close_gui(panel);
    overlay.exit_services();

    if let Some(audio) = overlay.audio() {
        log::debug!("master volume left at {:?}", audio.master_volume().ok());
    }

    result
}
