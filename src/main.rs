use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use well_mind::console::{parse_line, Input, HELP};
use well_mind::{load_session, ui, AppState, ClientConfig, HttpApi, Msg, Runtime};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = ClientConfig::from_env()?;
    let session = load_session(&config.session_path).await?;
    if let Some(user) = &session {
        info!(user_id = user.id, "restored session");
    }

    info!("using backend at {}", config.api_base_url);
    let api = Arc::new(HttpApi::new(config.api_base_url.clone()));
    let state = AppState::new(config.demo_user, session);
    let mut runtime = Runtime::new(api, config.session_path.clone(), state);

    runtime.dispatch(Msg::PageLoaded);
    println!("{}", ui::render(runtime.state()));
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        error!("failed to read input: {err}");
                        break;
                    }
                };
                match parse_line(&line) {
                    Input::Msgs(msgs) => {
                        for msg in msgs {
                            runtime.dispatch(msg);
                        }
                        println!("{}", ui::render(runtime.state()));
                    }
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Unknown(line) => println!("unknown command: {line} (try 'help')"),
                }
            }
            Some(msg) = runtime.next() => {
                let redraw = msg.redraws();
                runtime.dispatch(msg);
                if redraw {
                    println!("{}", ui::render(runtime.state()));
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    if runtime.has_outstanding() {
        info!("waiting for pending requests");
        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while runtime.has_outstanding() && runtime.pump().await {}
        })
        .await;
        if drained.is_err() {
            warn!("gave up on pending requests after {DRAIN_TIMEOUT:?}");
        }
        println!("{}", ui::render(runtime.state()));
    }
    runtime.close().await;

    info!("bye");
    Ok(())
}
