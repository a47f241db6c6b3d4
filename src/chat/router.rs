/// Message routing — broadcast fan-out and whispers.
///
/// Every delivery is best-effort: a send into a departing session's
/// channel errors, and that result is discarded at the call site so one
/// bad recipient never blocks the rest or bubbles back to the sender.
use super::log::{stamp, ChatLog};
use super::registry::Registry;

/// Send `line` to every registered client except `exclude`.
pub async fn broadcast(registry: &Registry, line: &str, exclude: Option<&str>) {
    for handle in registry.snapshot().await {
        if exclude.is_some_and(|name| handle.name == name) {
            continue;
        }
        let _ = handle.tx.send(line.to_owned());
    }
}

/// Public message: format with a timestamp, log once, deliver to
/// everyone — including the sender, who sees their own message echoed.
pub async fn broadcast_public(registry: &Registry, log: &ChatLog, sender: &str, text: &str) {
    let line = stamp(&format!("{sender}: {text}"));
    log.append(line.clone());
    broadcast(registry, &line, None).await;
}

/// Whisper: deliver to the target and echo the identical line back to
/// the sender. An unknown target yields a notice to the sender only.
///
/// The attempt is logged before the lookup, so the log shows every
/// whisper whether or not it found its recipient.
pub async fn whisper(registry: &Registry, log: &ChatLog, sender: &str, target: &str, text: &str) {
    let line = format!("[whisper] {sender} → {target}: {text}");
    log.record(&line);

    match registry.get(target).await {
        Some(handle) => {
            let _ = handle.tx.send(line.clone());
            if let Some(me) = registry.get(sender).await {
                let _ = me.tx.send(line);
            }
        }
        None => {
            if let Some(me) = registry.get(sender).await {
                let _ = me.tx.send(format!("User '{target}' not found."));
            }
        }
    }
}
