//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del workspace. Todo usa blake3 en hex.

use std::io::{self, Read};

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash de un valor JSON sobre su forma canónica.
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

/// Hash incremental de un stream (contenido de artifacts).
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut h = Hasher::new();
    io::copy(&mut reader, &mut h)?;
    Ok(h.finalize().to_hex().to_string())
}
