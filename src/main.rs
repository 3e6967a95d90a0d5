use anyhow::{bail, Context, Result};
use clap::Parser;

use bindkit::bind::{
    combo_display, default_controls, load_binds_file, load_default_binds, BindManager, BindsFile,
    GroupReport, InputState,
};
use bindkit::cli::{CliArgs, Command, DumpFormat};
use bindkit::config::EngineConfig;
use bindkit::script::Script;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    bindkit::tracing::init();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::load(),
    };
    let binds = match &args.binds {
        Some(path) => load_binds_file(path)
            .with_context(|| format!("loading binds {}", path.display()))?,
        None => load_default_binds(),
    };

    let input = InputState::new();
    let mut manager = BindManager::with_controls(config, default_controls(&input));
    let reports = binds.apply(&mut manager);

    match args.command {
        Command::Check => check(&manager, &reports)?,
        Command::Dump { format } => {
            let file = BindsFile::capture(&manager);
            let out = match format {
                DumpFormat::Yaml => file.to_yaml()?,
                DumpFormat::Json => file.to_json()?,
            };
            println!("{}", out.trim_end());
        }
        Command::Controls => {
            for control in manager.controls().iter() {
                let kind = if control.is_analog() { "analog" } else { "digital" };
                println!("{:>4}  {:<16} {}", control.index().index(), control.name(), kind);
            }
        }
        Command::Simulate { script } => {
            let script = Script::load(&script)?;
            for event in script.run(&mut manager, &input)? {
                println!("{}", event);
            }
        }
    }

    manager.close();
    Ok(())
}

fn check(manager: &BindManager, reports: &[GroupReport]) -> Result<()> {
    let controls = manager.controls();
    for group in manager.groups() {
        for bind in group.iter() {
            let combo = if bind.is_unbound() {
                "<unbound>".to_string()
            } else {
                combo_display(controls, bind.combo())
            };
            println!("{}/{:<20} {}", group.name(), bind.name(), combo);
        }
    }

    let mut rejected = 0;
    for group in reports {
        for (bind, err) in &group.report.errors {
            eprintln!("{}/{}: {}", group.group, bind, err);
            rejected += 1;
        }
    }

    let total: usize = manager.groups().map(|g| g.len()).sum();
    if rejected > 0 {
        bail!("{} of the bind entries were rejected", rejected);
    }
    println!(
        "ok: {} binds in {} groups, hold threshold {} ticks",
        total,
        reports.len(),
        manager.config().hold_threshold_ticks()
    );
    Ok(())
}
