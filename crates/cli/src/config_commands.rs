use {anyhow::Result, clap::Subcommand};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a starter config file to the user-global location.
    Init,
    /// Print the path of the config file in use (or where one would go).
    Path,
}

pub fn handle_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => init(),
        ConfigAction::Path => {
            println!(
                "{}",
                atelier_config::find_or_default_config_path().display()
            );
            Ok(())
        },
    }
}

/// Write `AtelierConfig::default()` as TOML. Refuses to clobber an
/// existing file.
fn init() -> Result<()> {
    let path = atelier_config::find_or_default_config_path();
    if path.exists() {
        anyhow::bail!("config already exists at {}", path.display());
    }
    let written = atelier_config::save_config(&atelier_config::AtelierConfig::default())?;
    eprintln!("Wrote {}", written.display());
    Ok(())
}
