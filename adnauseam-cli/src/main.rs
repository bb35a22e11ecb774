//! adnauseam: re-render config files from etcd and restart a command when they change.
//!
//! # Usage
//!
//! ```text
//! adnauseam [-t <template>:<output>]... [--config <path>] [--endpoint <url>]
//!           [--namespace <path>] [--no-env] [--] CMD...
//! ```
//!
//! Example: `adnauseam -t my.template:config.conf /usr/bin/command`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use adnauseam_core::{config, Config, TemplateBinding};
use adnauseam_daemon::{start_blocking, RunOptions};

#[derive(Parser, Debug)]
#[command(
    name = "adnauseam",
    version,
    about = "Monitor etcd and keep config files rendered from templates, restarting CMD on change",
    long_about = None,
)]
struct Cli {
    /// Template binding; repeat for several outputs.
    #[arg(short = 't', long = "template", value_name = "TEMPLATE:OUTPUT")]
    templates: Vec<TemplateBinding>,

    /// Config file to use instead of ~/.adnauseam/config.yaml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Store endpoint, e.g. http://127.0.0.1:4001.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Key prefix to watch.
    #[arg(long, value_name = "PATH")]
    namespace: Option<String>,

    /// Do not inject the process environment under env/.
    #[arg(long)]
    no_env: bool,

    /// Command line of the supervised process.
    #[arg(
        value_name = "CMD",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    command: Vec<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => config::load_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => config::load().context("loading default config")?,
        };
        if let Some(endpoint) = &self.endpoint {
            config.store.endpoint = endpoint.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.store.namespace = namespace.clone();
        }
        if self.no_env {
            config.seed_env = false;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    start_blocking(RunOptions {
        bindings: cli.templates,
        command: cli.command,
        config,
    })
    .context("adnauseam stopped")?;

    println!("...finishing");
    Ok(())
}
