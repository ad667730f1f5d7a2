//! Ereignisschleife der Chat-Sitzung
//!
//! Ein einziger `select!` ueber Relay-Events und Eingabezeilen. Eingehende
//! Events werden in Lieferreihenfolge verarbeitet, Zeilen in
//! Eingabereihenfolge.

use tokio::sync::mpsc;
use worstgen_protocol::RelayChannel;

use crate::display::ChatDisplay;
use crate::error::ChatResult;
use crate::session::{ChatSession, QUIT_SENTINEL};
use crate::types::Flow;

/// Laeuft bis `/quit`, Ende der Eingabe oder Trennung durch das Relay
pub async fn chat_ausfuehren<C, D>(
    session: &mut ChatSession<C, D>,
    eingabe: &mut mpsc::UnboundedReceiver<String>,
) -> ChatResult<Flow>
where
    C: RelayChannel,
    D: ChatDisplay,
{
    session.history_anzeigen();

    loop {
        let flow = tokio::select! {
            flow = session.empfangen() => flow,
            zeile = eingabe.recv() => match zeile {
                Some(zeile) => session.send(&zeile).await?,
                None => {
                    tracing::debug!("Eingabe geschlossen, beende Sitzung");
                    session.send(QUIT_SENTINEL).await?
                }
            },
        };

        if flow.ist_ende() {
            return Ok(flow);
        }
    }
}
