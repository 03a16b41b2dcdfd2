#![warn(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic)]

use clap::Parser;
use cocarde::{
    cli::{parse_script, Cli, ScriptCommand},
    compositor::{Compositor, Fake},
    config::Settings,
    controller::{IndicatorController, State},
    geometry::{Rect, Size},
    indicator::SegmentSet,
    logger,
};
use eyre::{Result, WrapErr as _};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Report<'a> {
    settings: &'a Settings,
    segment_set: &'a SegmentSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    trace: Vec<Step>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Step {
    command: String,
    time: f64,
    state: State,
    local_times: Vec<f64>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    logger::init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(style) = cli.style {
        settings.indicator.style = style;
    }
    if let Some(segments) = cli.segments {
        settings.indicator.segment_count = segments;
    }
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    let script = cli.script.as_deref().map(parse_script).transpose()?.unwrap_or_default();

    let rng = settings.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let mut controller = IndicatorController::with_rng(Fake::default(), rng);
    controller.set_hides_when_stopped(settings.hides_when_stopped);
    if settings.animating {
        controller.start();
    }
    controller.configure(settings.indicator.clone()).wrap_err("configuring the indicator")?;

    let mut trace = Vec::with_capacity(script.len());
    for command in script {
        match command {
            ScriptCommand::Start => controller.start(),
            ScriptCommand::Stop => controller.stop(false),
            ScriptCommand::Hide => controller.stop(true),
            ScriptCommand::Toggle => controller.toggle(),
            ScriptCommand::Wait(seconds) => controller.compositor_mut().advance(seconds),
            ScriptCommand::Resize(width, height) => controller
                .resize(Rect::from_size(Size::new(width, height)))
                .wrap_err("resizing the indicator")?,
        }
        controller.tick();
        trace.push(Step {
            command: format!("{command:?}"),
            time: controller.compositor().now(),
            state: controller.state(),
            local_times: controller.local_times(),
        });
    }

    let segment_set = controller.segment_set().ok_or_else(|| eyre::eyre!("nothing generated"))?;
    let report = Report { settings: &settings, segment_set, trace };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
