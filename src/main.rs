//! a2a-mesh: run the reference agents
//!
//! `serve <agent>` runs one agent, `serve-all` runs the whole topology in
//! this process.

use std::path::PathBuf;

use a2a_mesh::{
    config::TopologyConfig,
    skills::{agent_server, AgentRole},
    telemetry,
};
use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::{net::TcpListener, signal, sync::watch, task::JoinSet};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "a2a-mesh")]
#[command(about = "A2A task protocol agents with a routing coordinator")]
#[command(version)]
struct Cli {
    /// Topology file (TOML)
    #[arg(short, long, value_name = "FILE", env = "A2A_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single agent
    Serve {
        #[arg(value_enum)]
        agent: AgentRole,
    },
    /// Run every agent in this process
    ServeAll,
    /// Print the resolved topology
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_from_env();

    let config = TopologyConfig::load(cli.config.as_deref()).context("loading topology")?;

    match cli.command {
        Commands::Serve { agent } => serve(&config, &[agent]).await,
        Commands::ServeAll => serve(&config, &AgentRole::ALL).await,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(config: &TopologyConfig, roles: &[AgentRole]) -> anyhow::Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut agents = JoinSet::new();

    for &role in roles {
        let url = config.url(role)?;
        let server = agent_server(role, &url, config.router()?);
        let addr = config.bind_addr(role);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {} agent to {}", role, addr))?;

        let mut rx = shutdown_rx.clone();
        agents.spawn(async move {
            let shutdown = async move {
                let _ = rx.changed().await;
            };
            (role, server.serve_with_shutdown(listener, shutdown).await)
        });
    }

    tokio::select! {
        result = signal::ctrl_c() => {
            result.context("waiting for ctrl-c")?;
            info!("Shutdown requested");
        }
        Some(joined) = agents.join_next() => {
            report(joined);
        }
    }

    let _ = shutdown_tx.send(true);
    while let Some(joined) = agents.join_next().await {
        report(joined);
    }

    info!("All agents stopped");
    Ok(())
}

fn report(joined: Result<(AgentRole, std::io::Result<()>), tokio::task::JoinError>) {
    match joined {
        Ok((role, Ok(()))) => info!(agent = %role, "Agent stopped"),
        Ok((role, Err(e))) => error!(agent = %role, error = %e, "Agent failed"),
        Err(e) => error!(error = %e, "Agent task aborted"),
    }
}
