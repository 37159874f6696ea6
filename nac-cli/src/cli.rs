//! Command-line definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use nac_codes::SlotId;
use nac_receiver::MuteBehavior;

/// Control a Naim NAC preamplifier through a Broadlink IR blaster
#[derive(Debug, Parser)]
#[command(name = "nacremote")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Use the simulated blaster and preamplifier instead of a real output
    #[arg(long, global = true)]
    pub sim: bool,

    /// Stream service calls to this host:port instead of stdout
    #[arg(long, global = true, value_name = "ADDR", conflicts_with = "sim")]
    pub connect: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and save the device setup
    Setup(SetupArgs),

    /// Read intents line by line, keeping believed state between them
    Shell,

    #[command(flatten)]
    Intent(Intent),
}

/// Intents accepted both as subcommands and as shell lines
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Intent {
    /// List the configured inputs and their labels
    Labels,

    /// Show the believed receiver state as JSON
    Status,

    /// Select an input by its label
    SelectSource {
        /// Label as configured, e.g. CD
        source: String,
    },

    /// Send the mute toggle
    Mute {
        /// Requested state; only honored with mute behavior `honor`
        #[arg(long, value_enum)]
        state: Option<Switch>,
    },

    /// Step the volume up one notch
    VolumeUp,

    /// Step the volume down one notch
    VolumeDown,

    /// Send a raw command: one..six, volume_up, volume_down or mute
    Send {
        command: String,
    },
}

/// One line typed into the shell
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub intent: Intent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MuteArg {
    /// Always toggle, whatever state is requested
    Toggle,
    /// Only send when the believed state differs from the request
    Honor,
}

impl From<MuteArg> for MuteBehavior {
    fn from(arg: MuteArg) -> Self {
        match arg {
            MuteArg::Toggle => MuteBehavior::Toggle,
            MuteArg::Honor => MuteBehavior::Honor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    Stdout,
    Tcp,
    Sim,
}

impl OutputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Stdout => "stdout",
            OutputKind::Tcp => "tcp",
            OutputKind::Sim => "sim",
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SetupArgs {
    /// Device name
    #[arg(long)]
    pub name: Option<String>,

    /// Blaster entity id, e.g. remote.lounge_rm4
    #[arg(long)]
    pub broadlink: Option<String>,

    /// Label for one input, e.g. --input 3=Tuner (repeatable)
    #[arg(long = "input", value_name = "SLOT=LABEL", value_parser = parse_input)]
    pub inputs: Vec<(SlotId, String)>,

    /// How the mute request argument is handled
    #[arg(long, value_enum)]
    pub mute_behavior: Option<MuteArg>,

    /// Default output for later commands
    #[arg(long, value_enum)]
    pub output: Option<OutputKind>,

    /// Address for the tcp output
    #[arg(long, value_name = "ADDR")]
    pub address: Option<String>,
}

/// Parse `N=LABEL` or `inputN=LABEL`
pub fn parse_input(s: &str) -> Result<(SlotId, String), String> {
    let (slot, label) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=LABEL, got '{s}'"))?;

    let slot = slot.trim();
    let number = slot.strip_prefix("input").unwrap_or(slot);
    let slot = number
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| SlotId::ALL.get(i).copied())
        .ok_or_else(|| format!("no input '{slot}'; inputs are 1 to 6"))?;

    Ok((slot, label.trim().to_string()))
}
