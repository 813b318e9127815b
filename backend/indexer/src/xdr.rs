//! Soroban `ScVal` decoding into plain JSON.
//!
//! Two encodings reach the indexer:
//!
//! * base64 XDR, the default `getEvents` output;
//! * the RPC's JSON rendering (`xdrFormat: "json"`), where every value is a
//!   single-key object such as `{"i128":"100"}` or `{"map":[...]}`.
//!
//! Both are flattened to the same shape: maps keyed by symbol become JSON
//! objects, 128-bit integers become decimal strings and addresses become
//! `G...`/`C...` strkeys. Only the value kinds the presale contract emits
//! are supported; anything else decodes to `None`.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Map, Value};

// ScVal discriminants.
const SCV_BOOL: u32 = 0;
const SCV_VOID: u32 = 1;
const SCV_U32: u32 = 3;
const SCV_I32: u32 = 4;
const SCV_U64: u32 = 5;
const SCV_I64: u32 = 6;
const SCV_TIMEPOINT: u32 = 7;
const SCV_DURATION: u32 = 8;
const SCV_U128: u32 = 9;
const SCV_I128: u32 = 10;
const SCV_BYTES: u32 = 13;
const SCV_STRING: u32 = 14;
const SCV_SYMBOL: u32 = 15;
const SCV_VEC: u32 = 16;
const SCV_MAP: u32 = 17;
const SCV_ADDRESS: u32 = 18;

// ScAddress discriminants and their strkey version bytes.
const SC_ADDRESS_ACCOUNT: u32 = 0;
const SC_ADDRESS_CONTRACT: u32 = 1;
const STRKEY_ACCOUNT: u8 = 6 << 3;
const STRKEY_CONTRACT: u8 = 2 << 3;

const MAX_DEPTH: usize = 16;

/// Decode a base64 XDR `ScVal`. Returns `None` for malformed input,
/// unsupported kinds or trailing bytes.
pub fn decode_base64(b64: &str) -> Option<Value> {
    let bytes = STANDARD.decode(b64.trim()).ok()?;
    let mut reader = Reader::new(&bytes);
    let value = reader.scval(0)?;
    reader.is_empty().then_some(value)
}

/// Flatten the RPC's JSON `ScVal` rendering. Values that are not in that
/// shape (plain payloads, `{"type":…,"value":…}` wrappers) pass through.
pub fn normalize_json(value: &Value) -> Value {
    let Value::Object(obj) = value else {
        return value.clone();
    };
    let Some((tag, inner)) = obj.iter().next().filter(|_| obj.len() == 1) else {
        return value.clone();
    };

    match tag.as_str() {
        "map" => match inner {
            Value::Array(entries) => {
                let mut out = Map::new();
                for entry in entries {
                    if let (Some(k), Some(v)) = (entry.get("key"), entry.get("val")) {
                        if let Some(key) = key_text(&normalize_json(k)) {
                            out.insert(key, normalize_json(v));
                        }
                    }
                }
                Value::Object(out)
            }
            _ => Value::Null,
        },
        "vec" => match inner {
            Value::Array(items) => Value::Array(items.iter().map(normalize_json).collect()),
            _ => Value::Null,
        },
        "i128" | "u128" => match inner {
            Value::Object(parts) => wide_from_parts(tag == "i128", parts).unwrap_or(Value::Null),
            Value::Number(n) => Value::String(n.to_string()),
            other => other.clone(),
        },
        "bool" | "u32" | "i32" | "u64" | "i64" | "timepoint" | "duration" | "symbol"
        | "string" | "address" | "bytes" | "i256" | "u256" => inner.clone(),
        "void" => Value::Null,
        _ => value.clone(),
    }
}

/// Older RPC builds render 128-bit integers as `{"hi":…,"lo":…}`.
fn wide_from_parts(signed: bool, parts: &Map<String, Value>) -> Option<Value> {
    let lo = parts.get("lo")?.as_u64()?;
    let text = if signed {
        let hi = parts.get("hi")?.as_i64()?;
        (((hi as i128) << 64) | lo as i128).to_string()
    } else {
        let hi = parts.get("hi")?.as_u64()?;
        (((hi as u128) << 64) | lo as u128).to_string()
    };
    Some(Value::String(text))
}

fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────
// XDR reader
// ─────────────────────────────────────────────────────────

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }

    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(n)?;
        let chunk = self.bytes.get(self.pos..end)?;
        self.pos = end;
        Some(chunk)
    }

    fn u32(&mut self) -> Option<u32> {
        Some(u32::from_be_bytes(self.take(4)?.try_into().ok()?))
    }

    fn u64(&mut self) -> Option<u64> {
        Some(u64::from_be_bytes(self.take(8)?.try_into().ok()?))
    }

    /// Variable-length opaque data, padded to a multiple of four bytes.
    fn var_opaque(&mut self) -> Option<&'a [u8]> {
        let len = self.u32()? as usize;
        let data = self.take(len)?;
        let pad = (4 - len % 4) % 4;
        self.take(pad)?;
        Some(data)
    }

    fn text(&mut self) -> Option<String> {
        let data = self.var_opaque()?;
        std::str::from_utf8(data).ok().map(String::from)
    }

    fn scval(&mut self, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        let value = match self.u32()? {
            SCV_BOOL => Value::Bool(self.u32()? != 0),
            SCV_VOID => Value::Null,
            SCV_U32 => json!(self.u32()?),
            SCV_I32 => json!(self.u32()? as i32),
            SCV_U64 | SCV_TIMEPOINT | SCV_DURATION => json!(self.u64()?),
            SCV_I64 => json!(self.u64()? as i64),
            SCV_U128 => {
                let hi = self.u64()? as u128;
                let lo = self.u64()? as u128;
                Value::String(((hi << 64) | lo).to_string())
            }
            SCV_I128 => {
                let hi = self.u64()? as i64 as i128;
                let lo = self.u64()? as i128;
                Value::String(((hi << 64) | lo).to_string())
            }
            SCV_BYTES => Value::String(STANDARD.encode(self.var_opaque()?)),
            SCV_STRING | SCV_SYMBOL => Value::String(self.text()?),
            SCV_VEC => match self.u32()? {
                0 => Value::Null,
                _ => {
                    let count = self.u32()?;
                    let mut items = Vec::new();
                    for _ in 0..count {
                        items.push(self.scval(depth + 1)?);
                    }
                    Value::Array(items)
                }
            },
            SCV_MAP => match self.u32()? {
                0 => Value::Null,
                _ => {
                    let count = self.u32()?;
                    let mut out = Map::new();
                    for _ in 0..count {
                        let key = key_text(&self.scval(depth + 1)?)?;
                        let val = self.scval(depth + 1)?;
                        out.insert(key, val);
                    }
                    Value::Object(out)
                }
            },
            SCV_ADDRESS => Value::String(self.address()?),
            _ => return None,
        };
        Some(value)
    }

    fn address(&mut self) -> Option<String> {
        match self.u32()? {
            SC_ADDRESS_ACCOUNT => {
                // PublicKey union: only ed25519 (0) exists.
                if self.u32()? != 0 {
                    return None;
                }
                Some(strkey(STRKEY_ACCOUNT, self.take(32)?))
            }
            SC_ADDRESS_CONTRACT => Some(strkey(STRKEY_CONTRACT, self.take(32)?)),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Strkey
// ─────────────────────────────────────────────────────────

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Stellar strkey: base32(version || payload || crc16-xmodem LE), unpadded.
fn strkey(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + 3);
    data.push(version);
    data.extend_from_slice(payload);
    let crc = crc16_xmodem(&data);
    data.extend_from_slice(&crc.to_le_bytes());
    base32(&data)
}

fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

fn base32(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}
