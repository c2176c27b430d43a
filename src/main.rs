use chrono::{Datelike, Utc};
use clap::Parser;
use quake_explorer::adapters::render::section_summary;
use quake_explorer::config::{Command, SelectionArgs};
use quake_explorer::core::cascade::available_years;
use quake_explorer::core::stations::STATIONS;
use quake_explorer::core::{ConfigProvider, Renderer, Storage};
use quake_explorer::domain::scene::Artifact;
use quake_explorer::utils::logger;
use quake_explorer::{
    CascadeController, CliConfig, ExplorerError, FdsnClient, Iasp91Model, ListStatus, LocalStorage,
    Result, SelectorState, Session, TextRenderer, TomlConfig,
};

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting quake-explorer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.severity().exit_code());
        }
    };

    if let Err(e) = run(&cli.command, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = e.severity().exit_code();

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(command: &Command, config: &TomlConfig) -> Result<()> {
    let client = FdsnClient::from_config(config)?;
    let controller =
        CascadeController::new(client.clone()).with_policy(config.region_change_policy());
    let session = Session::new(client.clone(), client, Iasp91Model::default());
    let renderer = TextRenderer::new();
    let storage = LocalStorage::new(config.output_path().to_string());

    match command {
        Command::Stations => {
            for record in STATIONS.iter() {
                let reference = record.nearest_reference().unwrap_or("-");
                println!("{}  (reference {})", record.display_label, reference);
            }
        }
        Command::Events { selection, json } => {
            let state = select(&controller, config, selection).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&state.earthquakes.events)?);
            } else if state.earthquakes.is_empty() {
                println!("No earthquakes found");
            } else {
                for (idx, line) in state.earthquakes.lines.iter().enumerate() {
                    println!("{:>3}  {}", idx, line);
                }
            }
        }
        Command::Map { selection } => {
            let state = select(&controller, config, selection).await?;
            let scene = session.map_scene(&state).await?;
            publish(&storage, renderer.render_map(&scene)?).await?;
        }
        Command::Seismograms { selection } => {
            let state = select(&controller, config, selection).await?;
            let report = session.seismogram_report(&state).await?;
            publish(&storage, renderer.render_seismograms(&report)?).await?;
        }
        Command::Section { selection } => {
            let state = select(&controller, config, selection).await?;
            let section = session.record_section(&state).await?;
            print!("{}", section_summary(&section));
            let artifact = renderer.render_section(&section)?;
            let path = storage
                .write_file(&artifact.file_name, artifact.content.as_bytes())
                .await?;
            println!("📁 Section saved to: {}", path);
        }
        Command::Rays { selection } => {
            let state = select(&controller, config, selection).await?;
            let scene = session.ray_paths(&state).await?;
            publish(&storage, renderer.render_ray_paths(&scene)?).await?;
        }
    }

    Ok(())
}

/// Replays the command-line selections through the selector handlers.
async fn select(
    controller: &CascadeController<FdsnClient>,
    config: &TomlConfig,
    selection: &SelectionArgs,
) -> Result<SelectorState> {
    let year = selection.year.unwrap_or_else(|| Utc::now().year());
    if !available_years(config.start_year()).contains(&year) {
        return Err(ExplorerError::InvalidConfigValueError {
            field: "year".to_string(),
            value: year.to_string(),
            reason: format!("Years from {} to now are available", config.start_year()),
        });
    }
    let mut state = controller.blank_state(config.language(), year);

    if let Some(region) = &selection.region {
        state = controller.on_region_changed(&state, region)?;
    }
    if let Some(station) = &selection.station {
        state = controller.on_station_selected(&state, station)?;
    }

    let magnitude = selection
        .magnitude
        .clone()
        .unwrap_or_else(|| state.selected_min_magnitude.clone());
    state = controller.on_magnitude_changed(&state, &magnitude).await?;

    match state.earthquakes.status {
        ListStatus::FetchFailed => {
            tracing::warn!("⚠️ Earthquake catalog unavailable, the list is empty");
        }
        ListStatus::Ready { count } => tracing::info!("Found {} earthquakes", count),
        _ => {}
    }

    if !state.earthquakes.is_empty() {
        state = controller.on_earthquake_selected(&state, selection.event)?;
        if let Some(line) = state.earthquakes.selected_line() {
            tracing::info!("Selected: {}", line);
        }
    }

    Ok(state)
}

async fn publish(storage: &LocalStorage, artifact: Artifact) -> Result<()> {
    print!("{}", artifact.content);
    let path = storage
        .write_file(&artifact.file_name, artifact.content.as_bytes())
        .await?;
    tracing::info!("📁 Output saved to: {}", path);
    println!("📁 Output saved to: {}", path);
    Ok(())
}
