//! Configuration commands

use colored::Colorize;

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::error::Result;

fn update(opts: &GlobalOptions, edit: impl FnOnce(&mut Config)) -> Result<()> {
    let mut config = Config::load_at(opts.config_ref())?;
    edit(&mut config);
    config.validate()?;
    config.save_at(opts.config_ref())
}

pub fn set_host(opts: &GlobalOptions, url: String) -> Result<()> {
    let url = url.trim_end_matches('/').to_string();
    update(opts, |c| c.api_host = url.clone())?;
    println!("{} API host set to {}", "✓".green(), url.cyan());
    Ok(())
}

pub fn set_session(opts: &GlobalOptions, cookie: String) -> Result<()> {
    update(opts, |c| c.session = Some(cookie.trim().to_string()))?;
    println!("{} Session saved", "✓".green());
    Ok(())
}

/// Set the default buttery; "none" clears it
pub fn set_buttery(opts: &GlobalOptions, name: String) -> Result<()> {
    let buttery = match name.trim() {
        "" | "none" => None,
        other => Some(other.to_string()),
    };
    update(opts, |c| c.buttery = buttery.clone())?;

    match buttery {
        Some(b) => println!("{} Default buttery set to {}", "✓".green(), b.bold()),
        None => println!("{} Default buttery cleared", "✓".green()),
    }
    Ok(())
}
