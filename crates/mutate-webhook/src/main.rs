use anyhow::Result;
use lazy_static::lazy_static;
use mutate_webhook::{cli, config::Config, tracing::setup_tracing, MutateWebhook};
use std::{process, sync::RwLock};
use tokio::runtime::Runtime;
use tracing::{debug, error};

lazy_static! {
    static ref TRACE_SYSTEM_INITIALIZED: RwLock<bool> = RwLock::new(false);
}

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let config = Config::from_args(&matches)?;

    // rustls cannot pick a crypto provider on its own when more than one is
    // compiled in
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        fatal_error("Cannot install the default crypto provider".to_owned());
    }

    let rt = match Runtime::new() {
        Ok(r) => r,
        Err(error) => {
            fatal_error(format!("error initializing tokio runtime: {error}"));
            unreachable!();
        }
    };

    rt.block_on(async {
        // Setup the tracing system. This MUST be done inside of a tokio Runtime
        // because some collectors rely on it and would panic otherwise.
        match setup_tracing(&config.log_level, &config.log_fmt, config.log_no_color) {
            Err(err) => {
                fatal_error(err.to_string());
                unreachable!();
            }
            Ok(_) => {
                debug!("tracing system ready");
                if let Ok(mut initialized) = TRACE_SYSTEM_INITIALIZED.write() {
                    *initialized = true;
                }
            }
        };

        let webhook = match MutateWebhook::new_from_config(config).await {
            Ok(webhook) => webhook,
            Err(e) => {
                fatal_error(format!("error while creating the webhook server: {e:?}"));
                unreachable!();
            }
        };

        if let Err(e) = webhook.run().await {
            fatal_error(e.to_string());
        }
    });

    Ok(())
}

fn fatal_error(msg: String) {
    let trace_system_ready = TRACE_SYSTEM_INITIALIZED
        .read()
        .map(|ready| *ready)
        .unwrap_or_default();
    if trace_system_ready {
        error!("{}", msg);
    } else {
        eprintln!("{msg}");
    }

    process::exit(1);
}
