use anyhow::Result;
use clap::Parser;
use plugsync::commands::{self, GlobalOptions};
use std::path::PathBuf;

/// plugsync - plugin package installer
///
/// Installs plugin packages into a project's vendor directory, distributes the
/// files they declare under `extra.plugin` into the project tree and runs their
/// lifecycle hooks.
///
/// Examples:
///   plugsync install ../plugins/theme   # Install a plugin package directory
///   plugsync remove acme/theme          # Uninstall it again
#[derive(Parser, Debug)]
#[command(author, version = env!("PLUGSYNC_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root directory (defaults to the current directory; also via PLUGSYNC_ROOT)
    #[arg(
        long = "root",
        short = 'r',
        env = "PLUGSYNC_ROOT",
        value_name = "PATH",
        global = true
    )]
    pub root: Option<PathBuf>,

    /// Config file (defaults to <root>/plugsync.json)
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Vendor directory, relative to the project root (overrides the config file)
    #[arg(
        long = "vendor-dir",
        env = "PLUGSYNC_VENDOR_DIR",
        value_name = "PATH",
        global = true
    )]
    pub vendor_dir: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> GlobalOptions {
        GlobalOptions {
            root: self.root.clone(),
            config: self.config.clone(),
            vendor_dir: self.vendor_dir.clone(),
        }
    }
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Install plugin packages from their directories
    Install(InstallArgs),

    /// Update an installed plugin package from a new directory
    Update(UpdateArgs),

    /// Uninstall a plugin package
    Remove(NameArgs),

    /// Show the install state of a plugin package
    Status(NameArgs),

    /// List installed plugin packages
    List,
}

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Package directories containing a composer.json
    #[arg(value_name = "PACKAGE_DIR", required = true)]
    pub packages: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Package directory containing the new version
    #[arg(value_name = "PACKAGE_DIR")]
    pub package: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct NameArgs {
    /// Package name, e.g. "vendor/name"
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = cli.options();
    let runtime = plugsync::runtime::RealRuntime;

    match cli.command {
        Commands::Install(args) => commands::install(runtime, &args.packages, &options).await?,
        Commands::Update(args) => commands::update(runtime, &args.package, &options).await?,
        Commands::Remove(args) => commands::remove(runtime, &args.name, &options).await?,
        Commands::Status(args) => commands::status(runtime, &args.name, &options)?,
        Commands::List => commands::list(runtime, &options)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_install_parsing() {
        let cli = Cli::try_parse_from(["plugsync", "install", "plugins/a", "plugins/b"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(
                    args.packages,
                    vec![PathBuf::from("plugins/a"), PathBuf::from("plugins/b")]
                );
            }
            _ => panic!("Expected Install command"),
        }
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_cli_install_requires_package() {
        assert!(Cli::try_parse_from(["plugsync", "install"]).is_err());
    }

    #[test]
    fn test_cli_remove_parsing() {
        let cli = Cli::try_parse_from(["plugsync", "remove", "acme/theme"]).unwrap();
        match cli.command {
            Commands::Remove(args) => assert_eq!(args.name, "acme/theme"),
            _ => panic!("Expected Remove command"),
        }
    }

    #[test]
    fn test_cli_global_options_parsing() {
        let cli = Cli::try_parse_from([
            "plugsync",
            "--root",
            "/srv/app",
            "list",
            "--vendor-dir",
            "lib",
            "--config",
            "/etc/plugsync.json",
        ])
        .unwrap();
        let options = cli.options();
        assert_eq!(options.root, Some(PathBuf::from("/srv/app")));
        assert_eq!(options.vendor_dir, Some(PathBuf::from("lib")));
        assert_eq!(options.config, Some(PathBuf::from("/etc/plugsync.json")));
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["plugsync", "acme/theme"]).is_err());
    }
}
