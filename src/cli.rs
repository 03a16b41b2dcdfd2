//! Command Line Interface.

use crate::indicator::Style;
use clap::StructOpt;
use eyre::{bail, ensure, eyre, Result, WrapErr};
use std::{path::PathBuf, str::FromStr};

/// Generates a loading indicator and prints its segment set as JSON.
#[derive(StructOpt, Debug)]
#[clap(about, version = env!("GIT_VERSION"))]
pub struct Cli {
    /// Load settings from a JSON file.
    #[structopt(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Override the style: pie, ring-growth, equalizer-bars,
    /// random-equalizer or radial-fade.
    #[structopt(short = 's', long)]
    pub style: Option<Style>,
    /// Override the number of segments.
    #[structopt(short = 'n', long)]
    pub segments: Option<usize>,
    /// Seed the random source for reproducible output.
    #[structopt(long)]
    pub seed: Option<u64>,
    /// Replay lifecycle commands against an in-memory compositor, e.g.
    /// `start,wait:2.5,stop,wait:1,start`.
    #[structopt(long)]
    pub script: Option<String>,
}

/// One step of a `--script`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptCommand {
    /// `start`
    Start,
    /// `stop`: freeze in place.
    Stop,
    /// `hide`: stop and hide.
    Hide,
    /// `toggle`
    Toggle,
    /// `wait:<seconds>`
    Wait(f64),
    /// `resize:<width>x<height>`
    Resize(f64, f64),
}

impl FromStr for ScriptCommand {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = s.trim().split_once(':').map_or((s.trim(), None), |(n, a)| (n, Some(a)));
        match (name, arg) {
            ("start", None) => Ok(Self::Start),
            ("stop", None) => Ok(Self::Stop),
            ("hide", None) => Ok(Self::Hide),
            ("toggle", None) => Ok(Self::Toggle),
            ("wait", Some(seconds)) => {
                let seconds: f64 = seconds.parse().wrap_err("invalid wait duration")?;
                ensure!(seconds >= 0.0, "negative wait duration {seconds}");
                Ok(Self::Wait(seconds))
            }
            ("resize", Some(size)) => {
                let (width, height) =
                    size.split_once('x').ok_or_else(|| eyre!("expected <width>x<height>"))?;
                Ok(Self::Resize(
                    width.parse().wrap_err("invalid width")?,
                    height.parse().wrap_err("invalid height")?,
                ))
            }
            _ => bail!("unknown script command `{s}`"),
        }
    }
}

/// Parses a comma separated list of [`ScriptCommand`]s.
pub fn parse_script(script: &str) -> Result<Vec<ScriptCommand>> {
    script.split(',').filter(|step| !step.trim().is_empty()).map(str::parse).collect()
}
