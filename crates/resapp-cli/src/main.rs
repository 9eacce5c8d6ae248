use clap::{Parser, Subcommand};
use resapp_config::AppConfig;
use resapp_core::{
    input_files_xml, input_params_xml, instance_info_xml, ForwardingSession,
    NoopConnectorFactory, Registry,
};
use resapp_logfile_connector::LogFileConnectorFactory;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "resapp-cli")]
#[command(about = "Analytic results connector driver", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the configured connector through a full lifecycle and forward
    /// the sample result
    Run {
        /// Path to configuration directory
        #[arg(short, long, default_value = "config")]
        config_dir: String,
    },

    /// Print the connector's input-parameter, input-file and instance-info
    /// declarations as XML
    Describe {
        /// Registered connector type
        #[arg(short = 'n', long, default_value = "noop")]
        connector: String,
    },

    /// Check that the configuration satisfies the connector's declared
    /// requirements
    Validate {
        /// Path to configuration directory
        #[arg(short, long, default_value = "config")]
        config_dir: String,
    },
}

fn build_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Arc::new(NoopConnectorFactory));
    registry.register(Arc::new(LogFileConnectorFactory));
    registry
}

fn init_tracing(level: &str, json: bool) -> anyhow::Result<()> {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder().with_max_level(level);
    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config_dir } => {
            let app_config = AppConfig::load(&config_dir)?;
            init_tracing(&app_config.logging.level, app_config.logging.json)?;

            let registry = build_registry();
            info!("Available connectors: {:?}", registry.list());

            let spec = app_config.connector;
            let factory = registry.factory(&spec.connector_type)?;
            let connector = factory.create(spec.config)?;
            info!("Created '{}' connector", spec.connector_type);

            let mut session = ForwardingSession::new(connector);
            session
                .open(&spec.params, &spec.files, &spec.instance_info)
                .await?;
            session
                .forward(&spec.result.data, &spec.result.images, &spec.result.videos)
                .await?;

            let status = session.status();
            info!(
                "Session {} finished in status {} with {} result(s) forwarded",
                session.id(),
                status.connector_status,
                status.results_forwarded
            );
        }

        Commands::Describe { connector } => {
            init_tracing("warn", false)?;

            let registry = build_registry();
            let factory = registry.factory(&connector)?;
            let instance = factory.create(serde_json::json!({}))?;

            println!("{}", input_params_xml(&instance.required_input_params()));
            println!("{}", input_files_xml(&instance.required_input_files()));
            println!("{}", instance_info_xml(&instance.required_instance_info()));
        }

        Commands::Validate { config_dir } => {
            let app_config = AppConfig::load(&config_dir)?;
            init_tracing(&app_config.logging.level, app_config.logging.json)?;

            let registry = build_registry();
            let spec = app_config.connector;
            let factory = registry.factory(&spec.connector_type)?;
            let connector = factory.create(spec.config)?;

            let mut problems = Vec::new();
            for param in connector.required_input_params() {
                if param.required && !spec.params.contains_key(&param.name) {
                    problems.push(format!("missing input parameter '{}'", param.name));
                }
            }
            for file in connector.required_input_files() {
                if file.required && !spec.files.contains_key(&file.name) {
                    problems.push(format!("missing input file '{}'", file.name));
                }
            }
            for field in connector.required_instance_info() {
                if field.required && !spec.instance_info.contains_key(&field.name) {
                    problems.push(format!("missing instance info field '{}'", field.name));
                }
            }

            if problems.is_empty() {
                info!(
                    "Configuration satisfies the '{}' connector",
                    spec.connector_type
                );
            } else {
                for problem in &problems {
                    tracing::error!("{}", problem);
                }
                anyhow::bail!("{} problem(s) found", problems.len());
            }
        }
    }

    Ok(())
}
