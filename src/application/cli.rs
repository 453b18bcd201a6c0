use std::io;

use anyhow::Result;
use clap::Arg;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            Arg::new("shell")
                .short('s')
                .long("shell")
                .num_args(1)
                .required(true)
                .value_parser(clap::value_parser!(Shell))
                .help("Which shell to generate completions for."),
        );
}

pub fn build() -> Command {
    return Command::new("concierge")
        .about("Terminal client for chatting with a portfolio assistant service.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new(ConfigKey::BaseURL.to_string())
                .short('b')
                .long("base-url")
                .env("CONCIERGE_BASE_URL")
                .num_args(1)
                .help(format!(
                    "The URL of the assistant service. [default: {}]",
                    Config::default(ConfigKey::BaseURL)
                )),
        )
        .arg(
            Arg::new(ConfigKey::Backend.to_string())
                .long("backend")
                .env("CONCIERGE_BACKEND")
                .num_args(1)
                .help(format!(
                    "The backend used to answer questions. [default: {}]",
                    Config::default(ConfigKey::Backend)
                )),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long("config-file")
                .env("CONCIERGE_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to a configuration file. [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                )),
        )
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .short('u')
                .long("username")
                .env("CONCIERGE_USERNAME")
                .num_args(1)
                .help("The label shown in front of your own messages. [default: $USER]"),
        )
        .arg(
            Arg::new(ConfigKey::AssistantName.to_string())
                .long("assistant-name")
                .env("CONCIERGE_ASSISTANT_NAME")
                .num_args(1)
                .help(format!(
                    "The label shown in front of the assistant's messages. [default: {}]",
                    Config::default(ConfigKey::AssistantName)
                )),
        )
        .arg(
            Arg::new(ConfigKey::HealthCheckTimeout.to_string())
                .long("health-check-timeout")
                .env("CONCIERGE_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!(
                    "Milliseconds before the startup reachability check gives up. [default: {}]",
                    Config::default(ConfigKey::HealthCheckTimeout)
                )),
        )
        .subcommand(subcommand_completions());
}

/// Returns false when the invocation was fully handled here and the chat
/// loop should not start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();
    Config::load(&matches).await?;

    if let Some(subcmd_matches) = matches.subcommand_matches("completions") {
        if let Some(completions) = subcmd_matches.get_one::<Shell>("shell") {
            let mut cmd = build();
            print_completions(*completions, &mut cmd);
            return Ok(false);
        }
    }

    return Ok(true);
}
