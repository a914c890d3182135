use std::sync::Arc;

use clap::Parser;
use colored::*;

use echobot_lib::cli::{Args, Command};
use echobot_lib::models::ChatId;
use echobot_lib::services::config_service;
use echobot_lib::{ChatBackend, ChatController, HttpBackend, TerminalRenderer};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("echobot=info,echobot_lib=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let args = Args::parse();

    let mut config = config_service::get_effective_config()?;
    if let Some(base_url) = &args.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(session) = &args.session {
        config.session_cookie = Some(session.clone());
    }

    if let Command::Config { set_base_url, set_session } = &args.command {
        if let Some(url) = set_base_url {
            config_service::set_base_url(url)?;
        }
        if let Some(session) = set_session {
            config_service::set_session_cookie(Some(session))?;
        }
        let stored = config_service::load_config()?;
        println!("{}", "Stored configuration".bold());
        println!("  base_url:          {}", stored.base_url);
        println!("  session_cookie:    {}", if stored.session_cookie.is_some() { "set" } else { "not set" });
        println!("  debounce_ms:       {}", stored.debounce_ms);
        println!("  history_title_len: {}", stored.history_title_len);
        println!("  search_title_len:  {}", stored.search_title_len);
        println!("  file:              {}", config_service::get_config_path()?.display());
        return Ok(());
    }

    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::from_config(&config)?);
    let mut controller = ChatController::from_config(backend, TerminalRenderer::new(), &config);

    match args.command {
        Command::History => {
            controller.renderer_mut().set_conversation_visible(false);
            controller.load_chat_history().await?;
        }
        Command::Show { id } => {
            controller.load_specific_chat(&ChatId::new(id)).await?;
        }
        Command::Send { message, file } => {
            if let Some(path) = file {
                controller.upload_file(&path).await?;
            }
            controller.renderer_mut().set_history_visible(false);
            controller.send_message(&message).await;
        }
        Command::Search { query, open } => {
            // The local fallback searches the rendered history, so load it first.
            controller.renderer_mut().set_history_visible(false);
            controller.renderer_mut().set_conversation_visible(false);
            if let Err(err) = controller.load_chat_history().await {
                tracing::warn!(error = %err, "searching without local history");
            }

            controller.on_search_input(&query);
            let results = controller.settle_search().await;

            if open {
                if let Some(first) = results.first() {
                    controller.renderer_mut().set_conversation_visible(true);
                    controller.select_search_result(&first.id).await?;
                }
            }
        }
        Command::Upload { path } => {
            controller.upload_file(&path).await?;
        }
        Command::Export { dir } => {
            let path = controller.export_chat_history(&dir).await?;
            println!("{}", path.display());
        }
        Command::Delete { id } => {
            controller.renderer_mut().set_conversation_visible(false);
            controller.delete_chat(&ChatId::new(id)).await?;
        }
        Command::Whoami => {
            controller.initialize_user().await?;
        }
        Command::Logout => {
            controller.logout().await?;
            config_service::set_session_cookie(None)?;
            println!("Logged out.");
        }
        Command::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}
