//! The `setup` command

use nac_receiver::{validate, RawSetupInput, ValidatedConfiguration};
use tracing::info;

use crate::cli::SetupArgs;
use crate::error::CliError;
use crate::settings::Settings;

/// Merge command-line fields over the saved form (or form defaults)
pub fn merge_form(saved: Option<&RawSetupInput>, args: &SetupArgs) -> RawSetupInput {
    let mut raw = saved.cloned().unwrap_or_else(RawSetupInput::with_defaults);

    if let Some(name) = &args.name {
        raw.name = Some(name.clone());
    }
    if let Some(broadlink) = &args.broadlink {
        raw.broadlink = Some(broadlink.clone());
    }
    for (slot, label) in &args.inputs {
        raw.set_input(*slot, label.clone());
    }
    if let Some(behavior) = args.mute_behavior {
        raw.mute_behavior = behavior.into();
    }
    raw
}

/// Validate the merged form and store it, normalized, in `settings`
///
/// Nothing is changed when validation fails.
pub fn apply(settings: &mut Settings, args: &SetupArgs) -> Result<ValidatedConfiguration, CliError> {
    let raw = merge_form(settings.device.as_ref(), args);
    let config = validate(&raw)?;

    settings.device = Some(RawSetupInput::from(&config));
    if let Some(kind) = args.output {
        settings.output.connection_type = kind.as_str().to_string();
    }
    if let Some(address) = &args.address {
        settings.output.address = address.clone();
    }

    info!("Configured '{}' ({})", config.name, config.identity().unique_id());
    Ok(config)
}
