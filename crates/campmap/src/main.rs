//! `campmap` - CLI for the camp catalog
//!
//! This binary provides the command-line interface for adding, importing and
//! editing camps and for generating the interactive map.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use tracing::{debug, info};

use campmap::camp::UNKNOWN_POPULATION;
use campmap::cli::{
    AddCommand, Cli, Command, ConfigCommand, ImportCommand, ListCommand, RemoveCommand,
    RenderCommand, ShowCommand, TemplateCommand, UpdateCommand,
};
use campmap::{init_logging, CampDraft, CampManager, Config, Error, MapRenderer};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Add(cmd) => handle_add(&config, &cmd),
        Command::Import(cmd) => handle_import(&config, &cmd),
        Command::Interactive => handle_interactive(&config),
        Command::Template(cmd) => handle_template(&config, &cmd),
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Show(cmd) => handle_show(&config, &cmd),
        Command::Update(cmd) => handle_update(&config, &cmd),
        Command::Remove(cmd) => handle_remove(&config, &cmd),
        Command::Stats => handle_stats(&config),
        Command::Render(cmd) => handle_render(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the saved camps; a missing snapshot gives an empty collection.
fn open_manager(config: &Config) -> anyhow::Result<CampManager> {
    let mut manager = CampManager::from_config(config);
    match manager.load() {
        Ok(count) => debug!("Opened catalog with {count} camps"),
        Err(e) if e.is_file_not_found() => {
            info!(
                "No snapshot at {}, starting empty",
                manager.snapshot_path().display()
            );
        }
        Err(e) => return Err(e).context("failed to load the camp snapshot"),
    }
    Ok(manager)
}

fn save(manager: &CampManager) -> anyhow::Result<()> {
    let path = manager.save()?;
    println!("Saved {} camps to {}", manager.count(), path.display());
    Ok(())
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut manager = open_manager(config)?;
    let camp = manager.add(cmd.to_draft())?;
    println!("Added {camp}");
    save(&manager)
}

fn handle_import(config: &Config, cmd: &ImportCommand) -> anyhow::Result<()> {
    let mut manager = open_manager(config)?;
    let report = manager
        .load_csv(&cmd.file)
        .with_context(|| format!("failed to import {}", cmd.file.display()))?;

    println!("Rows read:      {}", report.rows);
    println!("Camps added:    {}", report.added);
    println!("Blank rows:     {}", report.blank);
    println!("Rows skipped:   {}", report.failed);
    save(&manager)
}

fn handle_interactive(config: &Config) -> anyhow::Result<()> {
    let mut manager = open_manager(config)?;
    let catalog = manager.catalog().clone();
    let theme = ColorfulTheme::default();

    println!("New camp");
    println!("--------");

    let name: String = Input::with_theme(&theme)
        .with_prompt("Camp name")
        .validate_with(|input: &String| -> Result<(), String> {
            let input = input.trim();
            if input.is_empty() {
                Err("a name is required".to_string())
            } else if manager.find_by_name(input).is_some() {
                Err(format!("'{input}' already exists"))
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    let latitude: f64 = Input::with_theme(&theme)
        .with_prompt("Latitude")
        .interact_text()?;
    let longitude: f64 = Input::with_theme(&theme)
        .with_prompt("Longitude")
        .interact_text()?;
    let population: String = Input::with_theme(&theme)
        .with_prompt("Population")
        .default(UNKNOWN_POPULATION.to_string())
        .interact_text()?;

    let radar_default = catalog
        .radar_types
        .iter()
        .position(|radar| *radar == catalog.default_radar)
        .unwrap_or_default();
    let radar = Select::with_theme(&theme)
        .with_prompt("Radar")
        .items(&catalog.radar_types)
        .default(radar_default)
        .interact()?;

    let icon_items: Vec<String> = catalog
        .icons
        .iter()
        .map(|icon| format!("{} ({})", icon.key, icon.description))
        .collect();
    let icon_default = catalog
        .icons
        .iter()
        .position(|icon| icon.key == catalog.default_icon)
        .unwrap_or_default();
    let icon = Select::with_theme(&theme)
        .with_prompt("Icon")
        .items(&icon_items)
        .default(icon_default)
        .interact()?;

    let draft = CampDraft::new(name.trim(), latitude, longitude)
        .population(population.trim())
        .radar(&catalog.radar_types[radar])
        .icon_type(&catalog.icons[icon].key);

    println!();
    println!("Name:        {}", draft.name);
    println!("Coordinates: {latitude}, {longitude}");
    println!("Population:  {}", population.trim());
    println!("Radar:       {}", catalog.radar_types[radar]);
    println!("Icon:        {}", icon_items[icon]);
    println!();

    let confirmed = Confirm::with_theme(&theme)
        .with_prompt("Add this camp?")
        .default(true)
        .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let camp = manager.add(draft)?;
    println!("Added {camp}");
    save(&manager)
}

fn handle_template(config: &Config, cmd: &TemplateCommand) -> anyhow::Result<()> {
    let manager = CampManager::from_config(config);
    let path = match &cmd.output {
        Some(path) => {
            manager.export_csv_template_to(path)?;
            path.clone()
        }
        None => manager.export_csv_template()?,
    };
    println!("CSV template written to {}", path.display());
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let manager = open_manager(config)?;
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&manager.snapshot().camps)?);
    } else {
        print!("{}", manager.list());
        if manager.is_empty() {
            println!();
        }
    }
    Ok(())
}

fn handle_show(config: &Config, cmd: &ShowCommand) -> anyhow::Result<()> {
    let manager = open_manager(config)?;
    let camp = manager
        .find_by_name(&cmd.name)
        .ok_or_else(|| Error::not_found(&cmd.name))?;

    if cmd.json {
        let record = camp.to_record(manager.catalog());
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Name:        {}", camp.name());
        println!("Latitude:    {:.6}", camp.latitude());
        println!("Longitude:   {:.6}", camp.longitude());
        println!("Population:  {}", camp.population());
        println!("Radar:       {}", camp.radar());
        println!("Icon:        {}", camp.icon_type());
    }
    Ok(())
}

fn handle_update(config: &Config, cmd: &UpdateCommand) -> anyhow::Result<()> {
    let changes = cmd.to_update();
    if changes.is_empty() {
        bail!("nothing to update: pass at least one of --rename, --lat, --lon, --pop, --radar, --icon");
    }

    let mut manager = open_manager(config)?;
    let camp = manager.update(&cmd.name, &changes)?;
    println!("Updated {camp}");
    save(&manager)
}

fn handle_remove(config: &Config, cmd: &RemoveCommand) -> anyhow::Result<()> {
    let mut manager = open_manager(config)?;
    if manager.find_by_name(&cmd.name).is_none() {
        return Err(Error::not_found(&cmd.name).into());
    }

    if !cmd.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Remove camp '{}'?", cmd.name))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let camp = manager.remove(&cmd.name)?;
    println!("Removed {camp}");
    save(&manager)
}

fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let manager = open_manager(config)?;
    print!("{}", manager.stats());
    Ok(())
}

fn handle_render(config: &Config, cmd: &RenderCommand) -> anyhow::Result<()> {
    config.ensure_directories()?;

    let manager = open_manager(config)?;
    if !manager.snapshot_path().exists() {
        save(&manager)?;
    }
    print!("{}", manager.stats());

    let output = cmd.output.clone().unwrap_or_else(|| config.output_path());
    let renderer = MapRenderer::new(&config.map, &config.catalog);
    let count = renderer.write(&manager, &cmd.to_options(), &output)?;
    println!("Map with {count} camps written to {}", output.display());
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Snapshot:        {}", config.snapshot_path().display());
                println!("  CSV template:    {}", config.template_path().display());
                println!(
                    "  Assets:          {}",
                    config.storage.assets_dir.display()
                );
                println!("  Map output:      {}", config.output_path().display());
                println!();
                println!("[Catalog]");
                println!(
                    "  Radar types:     {} (default {})",
                    config.catalog.radar_types.join(", "),
                    config.catalog.default_radar
                );
                println!(
                    "  Icons:           {} (default {})",
                    config.catalog.icon_keys().collect::<Vec<_>>().join(", "),
                    config.catalog.default_icon
                );
                println!();
                println!("[Map]");
                println!(
                    "  Center:          {}, {}",
                    config.map.center[0], config.map.center[1]
                );
                println!("  Zoom:            {}", config.map.zoom);
                println!("  Popup width:     {}", config.map.popup_max_width);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => bail!("configuration error: {e}"),
            }
        }
    }
    Ok(())
}
