//! Helpdesk - terminal front end for the support chat and content admin

use helpdesk_client::cli::{self, Command, CommandError, HELP};
use helpdesk_client::config::ClientConfig;
use helpdesk_client::content::ContentContext;
use helpdesk_client::remote::{HttpRemote, LoggingRemote};
use helpdesk_client::runtime::{
    ChatHandle, ChatRuntime, ChatViewEvent, ContentHandle, ContentRuntime, ContentViewEvent,
    ProductionRemote,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they don't interleave with the rendered views
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        base_url = %config.base_url,
        timeout = ?config.request_timeout,
        "Configuration loaded"
    );

    let remote: Arc<ProductionRemote> = Arc::new(LoggingRemote::new(HttpRemote::new(&config)?));

    let chat = ChatRuntime::spawn(remote.clone());
    let content = ContentRuntime::spawn(ContentContext::new(config.notice_duration), remote);

    tokio::spawn(print_chat(chat.subscribe()));
    tokio::spawn(print_content(content.subscribe()));

    // The admin list loads as soon as the page is up
    content.activate().await?;

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match cli::parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{HELP}"),
            Ok(command) => dispatch(&chat, &content, command).await?,
            Err(CommandError::Empty) => {}
            Err(e) => println!("{e}"),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

async fn dispatch(
    chat: &ChatHandle,
    content: &ContentHandle,
    command: Command,
) -> Result<(), String> {
    match command {
        Command::Open => chat.open().await,
        Command::Close => chat.close().await,
        Command::Pick(label) => chat.select_option(label).await,
        Command::Say(text) => chat.submit(text).await,
        Command::List => content.activate().await,
        Command::Add => content.begin_create().await,
        Command::Edit(id) => content.begin_edit(id).await,
        Command::Title(title) => content.edit_title(title).await,
        Command::Text(text) => content.edit_text(text).await,
        Command::Save => content.commit().await,
        Command::Cancel => content.cancel().await,
        Command::Menu(id) => content.toggle_row_menu(id).await,
        Command::Delete(id) => content.request_remove(id).await,
        Command::Yes => content.confirm_remove().await,
        Command::No => content.decline_remove().await,
        Command::Help | Command::Quit => Ok(()),
    }
}

async fn print_chat(mut rx: broadcast::Receiver<ChatViewEvent>) {
    loop {
        match rx.recv().await {
            Ok(ChatViewEvent::Snapshot(view)) => println!("{}\n", cli::render_chat(&view)),
            Ok(ChatViewEvent::Rejected { message }) => println!("chat: {message}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Chat printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

async fn print_content(mut rx: broadcast::Receiver<ContentViewEvent>) {
    loop {
        match rx.recv().await {
            Ok(ContentViewEvent::Snapshot(view)) => {
                println!("{}\n", cli::render_content(&view));
            }
            Ok(ContentViewEvent::ConfirmationRequested { prompt, .. }) => {
                println!("{prompt} (yes/no)");
            }
            Ok(ContentViewEvent::Alert { message }) => println!("!! {message}"),
            Ok(ContentViewEvent::Rejected { message }) => println!("content: {message}"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Content printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
