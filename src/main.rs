use anyhow::Result;
use ssb_cell_monitor::{
    config::Config,
    driver::MonitorDriver,
    inputs::{InputSource, JitterInputs, SharedInputs},
    simulation::{DegradationModel, SimulationEngine},
    sink::TracingSink,
    telemetry,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let operator = SharedInputs::new(cfg.inputs.initial());
    let source: Arc<dyn InputSource> = if cfg.inputs.jitter {
        Arc::new(JitterInputs::new(Arc::new(operator.clone())))
    } else {
        Arc::new(operator.clone())
    };

    let engine = SimulationEngine::new(cfg.engine.clone(), DegradationModel::new(cfg.model.clone()));
    let driver = MonitorDriver::new(
        engine,
        source,
        Box::new(TracingSink),
        cfg.driver.tick_interval(),
    );

    info!(
        tick_interval_ms = cfg.driver.tick_interval_ms,
        temperature_c = cfg.inputs.temperature_c,
        salt_ppm = cfg.inputs.salt_ppm,
        dod_percent = cfg.inputs.dod_percent,
        "starting SSB cell monitor"
    );

    let handle = driver.spawn();

    telemetry::shutdown_signal().await;
    handle.stop();

    let final_state = handle.snapshot();
    handle.join().await;

    info!(
        cycles = final_state.cycle_count,
        soh_percent = format_args!("{:.1}", final_state.state_of_health_percent),
        "shutdown complete"
    );
    Ok(())
}
