//! A guesser that runs player code compiled to WebAssembly.
//!
//! The module only sees its own linear memory and the request it is given, so
//! it cannot reach the game, the harness or the host. Everything it hands
//! back is treated as untrusted.

use std::{fmt::Display, fs, path::Path};

use log::{debug, error, info};
use serde_json::Value;
use wasmer::{imports, Instance, Memory, Module, NativeFunc, Store};

use crate::{game::Guess, guesser::Guesser, GuesserError, Result};

const FREE_FUNC: &str = "canonical_abi_free";
const REALLOC_FUNC: &str = "canonical_abi_realloc";

/// Guest exports are named this followed by the guesser's short name.
pub const GUESS_FUNC_PREFIX: &str = "guess_word_";

fn wasm_err(e: impl std::error::Error + 'static) -> GuesserError {
    GuesserError::Wasm(Box::new(e))
}

/// Checks that `len` bytes at `ptr` lie inside guest memory and returns the
/// range.
fn guest_range(
    memory: &Memory,
    ptr: i32,
    len: i32,
) -> Result<std::ops::Range<usize>, GuesserError> {
    let out_of_bounds = || {
        GuesserError::Malformed(format!("{} bytes at {} are outside guest memory", len, ptr))
    };

    let start = usize::try_from(ptr).map_err(|_| out_of_bounds())?;
    let len = usize::try_from(len).map_err(|_| out_of_bounds())?;
    let end = start.checked_add(len).ok_or_else(out_of_bounds)?;

    if end > memory.view::<u8>().len() {
        return Err(out_of_bounds());
    }
    Ok(start..end)
}

fn read_bytes(memory: &Memory, ptr: i32, len: i32) -> Result<Vec<u8>, GuesserError> {
    let range = guest_range(memory, ptr, len)?;
    let view = memory.view::<u8>();
    Ok(view[range].iter().map(|c| c.get()).collect())
}

fn write_bytes(memory: &Memory, ptr: i32, bytes: &[u8]) -> Result<(), GuesserError> {
    let len = i32::try_from(bytes.len()).map_err(wasm_err)?;
    let range = guest_range(memory, ptr, len)?;
    let view = memory.view::<u8>();
    for (cell, &b) in view[range].iter().zip(bytes) {
        cell.set(b);
    }
    Ok(())
}

fn read_i32(memory: &Memory, ptr: i32) -> Result<i32, GuesserError> {
    let bytes = read_bytes(memory, ptr, 4)?;
    Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Reads the reply described by the return area at `ret_area` and frees it.
///
/// The return area holds the reply's pointer in its first 8 byte slot and
/// its length in the next one.
fn take_reply(
    memory: &Memory,
    free: &NativeFunc<(i32, i32, i32), ()>,
    ret_area: i32,
) -> Result<Vec<u8>, GuesserError> {
    let ptr = read_i32(memory, ret_area)?;
    let len = read_i32(memory, ret_area.wrapping_add(8))?;
    let bytes = read_bytes(memory, ptr, len)?;

    free.call(ptr, len, 1).map_err(wasm_err)?;

    Ok(bytes)
}

/// A guesser backed by a WebAssembly module.
///
/// The module must export its `memory`, the `canonical_abi_realloc` and
/// `canonical_abi_free` allocator functions, and a function named
/// `guess_word_<short name>` taking the pointer and length of a request and
/// returning the address of its return area. Guessers written in Rust get all
/// of these from the [`exportable`](crate::exportable) attribute.
///
/// Requests and replies are encoded with MessagePack. The request is the
/// `(vocabulary, guesses)` pair and the reply is any value, which the game
/// then validates like every other guess.
#[derive(Debug, Clone)]
pub struct WasmGuesser {
    instance: Instance,
    short_name: String,
    guess_func: String,
}

impl WasmGuesser {
    /// Loads a compiled module from disk.
    pub fn new_from_wasm(wasm_path: impl AsRef<Path>, short_name: &str) -> Result<Self> {
        let wasm_path = wasm_path.as_ref();
        debug!("loading guesser module from {:?}", wasm_path);

        let binary = fs::read(wasm_path).map_err(wasm_err)?;
        Self::new_from_bytes(&binary, short_name)
    }

    /// Instantiates a module from its binary or text form.
    pub fn new_from_bytes(binary: &[u8], short_name: &str) -> Result<Self> {
        let store = Store::default();
        let module = Module::new(&store, binary).map_err(wasm_err)?;
        let imports = imports! {};
        let instance = Instance::new(&module, &imports).map_err(wasm_err)?;

        Self::validate(instance, short_name)
    }

    fn validate(instance: Instance, short_name: &str) -> Result<Self> {
        let guess_func = format!("{}{}", GUESS_FUNC_PREFIX, short_name);

        instance.exports.get_memory("memory").map_err(wasm_err)?;
        let _realloc: NativeFunc<(i32, i32, i32, i32), i32> = instance
            .exports
            .get_native_function(REALLOC_FUNC)
            .map_err(wasm_err)?;
        let _free: NativeFunc<(i32, i32, i32), ()> = instance
            .exports
            .get_native_function(FREE_FUNC)
            .map_err(wasm_err)?;

        if instance
            .exports
            .get_native_function::<(i32, i32), i32>(&guess_func)
            .is_err()
        {
            error!("module does not export `{}`", guess_func);
            return Err(GuesserError::NotDefined.into());
        }

        info!("loaded wasm guesser `{}`", short_name);

        Ok(Self {
            instance,
            short_name: short_name.to_string(),
            guess_func,
        })
    }
}

impl Guesser for WasmGuesser {
    fn guess_word(&self, vocabulary: &[String], guesses: &[Guess]) -> Result<Value, GuesserError> {
        let exports = &self.instance.exports;
        let realloc: NativeFunc<(i32, i32, i32, i32), i32> =
            exports.get_native_function(REALLOC_FUNC).map_err(wasm_err)?;
        let free: NativeFunc<(i32, i32, i32), ()> =
            exports.get_native_function(FREE_FUNC).map_err(wasm_err)?;
        let guess: NativeFunc<(i32, i32), i32> = exports
            .get_native_function(&self.guess_func)
            .map_err(|_| GuesserError::NotDefined)?;
        let memory = exports.get_memory("memory").map_err(wasm_err)?;

        let request = rmp_serde::to_vec(&(vocabulary, guesses)).map_err(wasm_err)?;
        let len = i32::try_from(request.len()).map_err(wasm_err)?;

        // the guest takes ownership of the request buffer
        let ptr = realloc.call(0, 0, 1, len).map_err(wasm_err)?;
        write_bytes(memory, ptr, &request)?;

        let ret_area = guess.call(ptr, len).map_err(wasm_err)?;
        let reply = take_reply(memory, &free, ret_area)?;

        rmp_serde::from_slice(&reply).map_err(|e| GuesserError::Malformed(e.to_string()))
    }
}

impl Display for WasmGuesser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wasm:{}", self.short_name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Dictionary, Game, PuzzleError};

    /// A guest whose return area always points at the MessagePack bytes at
    /// address 32 and claims they are `len` bytes long.
    fn fixed_reply(reply: &str, len: u32) -> String {
        let len: String = len
            .to_le_bytes()
            .iter()
            .map(|b| format!("\\{:02x}", b))
            .collect();
        format!(
            r#"(module
                (memory (export "memory") 1)
                (data (i32.const 16) "\20\00\00\00\00\00\00\00{len}")
                (data (i32.const 32) "{reply}")
                (func (export "canonical_abi_realloc") (param i32 i32 i32 i32) (result i32)
                    i32.const 1024)
                (func (export "canonical_abi_free") (param i32 i32 i32))
                (func (export "guess_word_fixed") (param i32 i32) (result i32)
                    i32.const 16))"#,
            len = len,
            reply = reply
        )
    }

    #[test]
    fn reply_is_decoded() {
        let guest = fixed_reply(r"\a5arose", 6);
        let guesser = WasmGuesser::new_from_bytes(guest.as_bytes(), "fixed").unwrap();
        let dictionary = Dictionary::builtin();

        let reply = guesser.guess_word(&dictionary, &[]).unwrap();
        assert_eq!(reply, Value::from("arose"));
        assert_eq!(guesser.to_string(), "wasm:fixed");
    }

    #[test]
    fn non_string_reply_is_rejected_by_the_game() {
        let guest = fixed_reply(r"\c0", 1);
        let guesser = WasmGuesser::new_from_bytes(guest.as_bytes(), "fixed").unwrap();
        let dictionary = Dictionary::builtin();
        let mut game = Game::new(&dictionary, "arose").unwrap();

        let reply = guesser.guess_word(&dictionary, game.history()).unwrap();
        assert_eq!(
            game.submit_value(&reply),
            Err(PuzzleError::InvalidWord("null".to_string()))
        );
    }

    #[test]
    fn reply_outside_memory() {
        let guest = fixed_reply(r"\a5arose", 0x7fff_ffff);
        let guesser = WasmGuesser::new_from_bytes(guest.as_bytes(), "fixed").unwrap();

        assert!(matches!(
            guesser.guess_word(&[], &[]),
            Err(GuesserError::Malformed(_))
        ));

        let memory = guesser.instance.exports.get_memory("memory").unwrap();
        assert!(matches!(
            read_bytes(memory, 65_530, 16),
            Err(GuesserError::Malformed(_))
        ));
        assert!(matches!(
            read_bytes(memory, -4, 4),
            Err(GuesserError::Malformed(_))
        ));
    }

    #[test]
    fn missing_guess_function() {
        let guest = fixed_reply(r"\a5arose", 6);
        assert!(matches!(
            WasmGuesser::new_from_bytes(guest.as_bytes(), "other"),
            Err(crate::WordleError::Guesser {
                kind: GuesserError::NotDefined
            })
        ));
    }

    #[test]
    fn not_a_module() {
        assert!(matches!(
            WasmGuesser::new_from_bytes(b"definitely not wasm", "fixed"),
            Err(crate::WordleError::Guesser {
                kind: GuesserError::Wasm(_)
            })
        ));
    }

    #[test]
    fn request_round_trips_through_memory() {
        let guest = fixed_reply(r"\a5arose", 6);
        let guesser = WasmGuesser::new_from_bytes(guest.as_bytes(), "fixed").unwrap();
        let memory = guesser.instance.exports.get_memory("memory").unwrap();

        write_bytes(memory, 2048, b"chaos").unwrap();
        assert_eq!(read_bytes(memory, 2048, 5).unwrap(), b"chaos");
        assert_eq!(read_i32(memory, 16).unwrap(), 32);
    }
}
