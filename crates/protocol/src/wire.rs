//! Wire-Format fuer die Relay-Verbindung
//!
//! Frame-basiertes Protokoll: Length(u32 big-endian) + JSON-Event.
//!
//! ## Frame-Format
//!
//! ```text
//! +--------+--------+--------+--------+----...----+
//! | Laenge (u32 BE) | 4 Bytes        | Payload    |
//! +--------+--------+--------+--------+----...----+
//! ```
//!
//! Die Laenge gibt die Anzahl der Payload-Bytes an (ohne die 4 Laengen-Bytes).
//! Maximale Frame-Groesse ist konfigurierbar (Standard: 1 MB).

use std::io;
use std::marker::PhantomData;

use bytes::{Buf, BufMut, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::codec::{Decoder, Encoder};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Standard-maximale Frame-Groesse (1 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Groesse des Laengen-Felds in Bytes
pub const LENGTH_FIELD_SIZE: usize = 4;

// ---------------------------------------------------------------------------
// FrameCodec
// ---------------------------------------------------------------------------

/// tokio-util Codec fuer frame-basierte Relay-Verbindungen
///
/// `D` wird dekodiert, `E` kodiert (Client: `FrameCodec<ServerEvent, ClientEvent>`,
/// Relay-Seite umgekehrt).
///
/// Frames deren JSON sich nicht als `D` lesen laesst (z.B. Events die
/// dieser Client nicht kennt) werden verworfen und protokolliert. Die
/// Verbindung bleibt dabei bestehen.
#[derive(Debug)]
pub struct FrameCodec<D, E> {
    /// Maximale erlaubte Frame-Groesse in Bytes
    max_frame_size: usize,
    _events: PhantomData<fn(E) -> D>,
}

impl<D, E> FrameCodec<D, E> {
    /// Erstellt einen neuen `FrameCodec` mit Standard-Limits
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Erstellt einen `FrameCodec` mit benutzerdefinierter maximaler Frame-Groesse
    pub fn with_max_size(max_frame_size: usize) -> Self {
        Self {
            max_frame_size,
            _events: PhantomData,
        }
    }

    /// Gibt die konfigurierte maximale Frame-Groesse zurueck
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl<D, E> Default for FrameCodec<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, E> Clone for FrameCodec<D, E> {
    fn clone(&self) -> Self {
        Self::with_max_size(self.max_frame_size)
    }
}

// ---------------------------------------------------------------------------
// Decoder-Implementierung
// ---------------------------------------------------------------------------

impl<D: DeserializeOwned, E> Decoder for FrameCodec<D, E> {
    type Item = D;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        loop {
            // Warte auf mindestens 4 Bytes fuer das Laengen-Feld
            if src.len() < LENGTH_FIELD_SIZE {
                return Ok(None);
            }

            let length = u32::from_be_bytes([src[0], src[1], src[2], src[3]]) as usize;

            if length > self.max_frame_size {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Frame zu gross: {} Bytes (Maximum: {} Bytes)",
                        length, self.max_frame_size
                    ),
                ));
            }

            let total_size = LENGTH_FIELD_SIZE + length;
            if src.len() < total_size {
                src.reserve(total_size - src.len());
                return Ok(None);
            }

            src.advance(LENGTH_FIELD_SIZE);
            let payload = src.split_to(length);

            match serde_json::from_slice::<D>(&payload) {
                Ok(event) => return Ok(Some(event)),
                Err(e) => {
                    tracing::warn!(
                        fehler = %e,
                        bytes = length,
                        "Unbekanntes oder ungueltiges Event verworfen"
                    );
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Encoder-Implementierung
// ---------------------------------------------------------------------------

impl<D, E: Serialize> Encoder<E> for FrameCodec<D, E> {
    type Error = io::Error;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = to_json(&item, self.max_frame_size)?;

        dst.reserve(LENGTH_FIELD_SIZE + json.len());
        dst.put_u32(json.len() as u32);
        dst.put_slice(&json);

        Ok(())
    }
}

fn to_json<E: Serialize>(item: &E, max_frame_size: usize) -> io::Result<Vec<u8>> {
    let json = serde_json::to_vec(item).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("JSON-Serialisierung fehlgeschlagen: {}", e),
        )
    })?;

    if json.len() > max_frame_size {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Nachricht zu gross: {} Bytes (Maximum: {} Bytes)",
                json.len(),
                max_frame_size
            ),
        ));
    }
    Ok(json)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
