/// Per-connection session — nickname negotiation, the active command
/// loop, and guaranteed cleanup.
///
/// Lifecycle: `Connected → NegotiatingName → Active → Terminated`. A
/// connection that drops before claiming a name terminates silently; a
/// named session always deregisters and announces its departure, no
/// matter how it ends (clean `/exit`, peer disconnect, or write error).
use std::net::SocketAddr;

use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_util::codec::Framed;
use tracing::{info, warn};

use super::codec::LineCodec;
use super::command::{valid_nickname, Command};
use super::log::ChatLog;
use super::registry::{ClientHandle, Registry};
use super::router;

const WELCOME: &str = "Welcome! Enter your nickname:";
const INVALID_NICK: &str = "Invalid nickname. Try again (no spaces, not starting with @):";
const NAME_TAKEN: &str = "Name already taken. Try another:";
const FAREWELL: &str = "Bye!";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Drive one client connection from accept to termination.
pub async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    registry: Registry,
    log: ChatLog,
) -> Result<(), BoxError> {
    let mut framed = Framed::new(socket, LineCodec);
    framed.send(WELCOME).await?;

    let Some((name, rx)) = negotiate(&mut framed, &registry, addr).await? else {
        // Peer left before claiming a name — nothing to clean up.
        return Ok(());
    };

    let joined = format!("🔵 {name} joined the chat.");
    log.record(&joined);
    router::broadcast(&registry, &joined, Some(&name)).await;

    // From here on every exit path must run the cleanup below, so the
    // active loop's errors are held rather than returned early.
    let result = active_loop(&mut framed, rx, &name, &registry, &log).await;

    if registry.remove(&name).await.is_some() {
        let left = format!("🔴 {name} left the chat.");
        log.record(&left);
        router::broadcast(&registry, &left, Some(&name)).await;
    }
    info!(%addr, name, "session terminated");

    result
}

/// Read lines until the client claims a valid, unique nickname.
///
/// Returns the claimed name and the delivery channel the registry now
/// routes to, or `None` if the peer disconnected first.
async fn negotiate(
    framed: &mut Framed<TcpStream, LineCodec>,
    registry: &Registry,
    addr: SocketAddr,
) -> Result<Option<(String, mpsc::UnboundedReceiver<String>)>, BoxError> {
    loop {
        let line = match framed.next().await {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                warn!(%addr, "read error during negotiation: {e}");
                return Ok(None);
            }
            None => return Ok(None),
        };

        let name = line.trim();
        if !valid_nickname(name) {
            framed.send(INVALID_NICK).await?;
            continue;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let claimed = registry
            .try_insert(ClientHandle {
                name: name.to_owned(),
                addr,
                tx,
            })
            .await;

        if claimed {
            return Ok(Some((name.to_owned(), rx)));
        }
        framed.send(NAME_TAKEN).await?;
    }
}

/// The `Active` state: interleave lines typed by this client with lines
/// routed to it by everyone else.
async fn active_loop(
    framed: &mut Framed<TcpStream, LineCodec>,
    mut rx: mpsc::UnboundedReceiver<String>,
    name: &str,
    registry: &Registry,
    log: &ChatLog,
) -> Result<(), BoxError> {
    framed
        .send(format!(
            "Hello, {name}! Say anything to chat. \
             Whisper with @nick message or /w nick message. Leave with /exit."
        ))
        .await?;

    loop {
        tokio::select! {
            // A line typed by this client.
            frame = framed.next() => {
                let line = match frame {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        warn!(name, "read error: {e}");
                        break;
                    }
                    None => break, // Connection closed.
                };

                match Command::parse(&line) {
                    Ok(Command::Empty) => {}
                    Ok(Command::Exit) => {
                        // Best-effort: the peer may already be gone.
                        let _ = framed.send(FAREWELL).await;
                        break;
                    }
                    Ok(Command::Whisper { target, text }) => {
                        router::whisper(registry, log, name, &target, &text).await;
                    }
                    Ok(Command::Public(text)) => {
                        router::broadcast_public(registry, log, name, &text).await;
                    }
                    Err(usage) => {
                        framed.send(usage.to_string()).await?;
                    }
                }
            }

            // A line routed to this client by another session.
            Some(line) = rx.recv() => {
                framed.send(line).await?;
            }
        }
    }

    Ok(())
}
