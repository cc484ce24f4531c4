//! Guest-side glue for guessers compiled to WebAssembly.
//!
//! Nothing here is meant to be called by hand. The
//! [`exportable`](crate::exportable) attribute emits an entry point that
//! forwards to [`guess_trampoline`].

use std::alloc::{self, Layout};

use serde_json::Value;

use crate::{game::Guess, guesser::Guesser};

#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Taken from https://github.com/bytecodealliance/wit-bindgen/blob/d505f87e67c42006631f913152ab16f96153cef4/crates/rust-wasm/src/futures.rs
#[no_mangle]
unsafe extern "C" fn canonical_abi_realloc(
    old_ptr: *mut u8,
    old_len: usize,
    align: usize,
    new_len: usize,
) -> *mut u8 {
    let layout;
    let ptr = if old_len == 0 {
        if new_len == 0 {
            return align as *mut u8;
        }
        layout = Layout::from_size_align_unchecked(new_len, align);
        alloc::alloc(layout)
    } else {
        layout = Layout::from_size_align_unchecked(old_len, align);
        alloc::realloc(old_ptr, layout, new_len)
    };
    if ptr.is_null() {
        alloc::handle_alloc_error(layout);
    }
    ptr
}

// Taken from https://github.com/bytecodealliance/wit-bindgen/blob/d505f87e67c42006631f913152ab16f96153cef4/crates/rust-wasm/src/futures.rs
#[no_mangle]
unsafe extern "C" fn canonical_abi_free(ptr: *mut u8, len: usize, align: usize) {
    if len == 0 {
        return;
    }
    let layout = Layout::from_size_align_unchecked(len, align);
    alloc::dealloc(ptr, layout);
}

/// Reply pointer at offset 0, reply length at offset 8.
static mut RET_AREA: [i64; 2] = [0; 2];

/// Decodes the request at `ptr`, asks `guesser` for a word and returns the
/// address of the return area describing the encoded reply.
///
/// A request that cannot be decoded, or a guesser that returns an error,
/// produces a `null` reply, which the host rejects as an invalid word.
///
/// # Safety
///
/// `ptr` and `len` must describe a buffer handed out by
/// `canonical_abi_realloc` with an alignment of 1. The buffer is freed here.
#[doc(hidden)]
pub unsafe fn guess_trampoline<G: Guesser>(guesser: &G, ptr: i32, len: i32) -> i32 {
    let request = Vec::from_raw_parts(ptr as *mut u8, len as usize, len as usize);

    let reply = match rmp_serde::from_slice::<(Vec<String>, Vec<Guess>)>(&request) {
        Ok((vocabulary, guesses)) => guesser
            .guess_word(&vocabulary, &guesses)
            .unwrap_or(Value::Null),
        Err(_) => Value::Null,
    };
    drop(request);

    let reply = rmp_serde::to_vec(&reply)
        .unwrap_or_default()
        .into_boxed_slice();
    let reply_ptr = reply.as_ptr() as i64;
    let reply_len = reply.len() as i64;
    core::mem::forget(reply);

    let area = std::ptr::addr_of_mut!(RET_AREA);
    (*area)[0] = reply_ptr;
    (*area)[1] = reply_len;
    area as i32
}
