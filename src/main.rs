use rubin_ts_mtdomegui::{
    config::ModelConfig, constants::SUBSYSTEMS, mock_dome_com::mock_dome_com::MockDomeCom,
    model::Model, registry::SchemaRegistry, signals::Signals,
};

use std::{env, error::Error, path::Path};
use tokio::task::JoinHandle;

/// Log the discrete state and the faults, in place of the panels.
fn connect_logging_panels(signals: &Signals) -> Vec<JoinHandle<()>> {
    vec![
        signals
            .interlock
            .interlock
            .connect(|interlocks| log::info!("Interlocks: {interlocks:?}")),
        signals
            .state
            .azimuth_axis
            .connect(|state| log::info!("Azimuth axis: {state:?}")),
        signals
            .state
            .elevation_axis
            .connect(|state| log::info!("Elevation axis: {state:?}")),
        signals
            .state
            .aperture_shutter
            .connect(|state| log::info!("Aperture shutter: {state:?}")),
        signals
            .state
            .power_mode
            .connect(|mode| log::info!("Power mode: {mode:?}")),
        signals
            .operational_mode
            .subsystem_mode
            .connect(|(subsystem, mode)| {
                log::info!("{}: {mode:?}", SUBSYSTEMS[subsystem.index()])
            }),
        signals
            .motion
            .azimuth_axis
            .connect(|(motion_state, in_position)| {
                log::debug!("Azimuth motion: {motion_state}, in position: {in_position}")
            }),
        signals
            .fault_code
            .azimuth_axis
            .connect(|fault_code| log::info!("Azimuth fault code: {fault_code:?}")),
        signals
            .config
            .amcs
            .connect(|config| log::info!("Azimuth configuration: {config:?}")),
        signals
            .telemetry
            .cbcs_voltage
            .connect(|voltage| log::debug!("DC bus voltage: {voltage} V")),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => ModelConfig::from_yaml_file(Path::new(&path))?,
        None => ModelConfig::default(),
    };

    let registry = SchemaRegistry::bundled()?;
    let mock_dome_com = MockDomeCom::start(&registry, &config.dome_com)?;
    let mut model = Model::create_and_start(config, mock_dome_com, &registry).await?;

    let panels = connect_logging_panels(model.get_signals());

    model.report_default().await?;
    model.connect().await?;

    tokio::signal::ctrl_c().await?;

    model.disconnect().await?;
    for panel in panels {
        panel.abort();
    }

    Ok(())
}
