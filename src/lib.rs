//! # simrt - Runtime Support for the Simulated Target
//!
//! This crate provides the two runtime primitives a bare-metal program on the
//! MIPS simulator cannot get for free: a **bump allocator** over a fixed
//! memory window and a **`printf`-style formatter** that prints through a
//! single-character output primitive or into a bounded buffer.
//!
//! ## Overview
//!
//! The allocator and the formatter do not know about each other; application
//! code uses either or both.
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                         APPLICATION                                  │
//!   └───────────────┬─────────────────────────────────┬────────────────────┘
//!                   │ allocate(size)                  │ printf!(sink, ...)
//!                   ▼                                 ▼
//!   ┌───────────────────────────────┐   ┌──────────────────────────────────┐
//!   │        BumpAllocator          │   │           Formatter              │
//!   │  base ─ cursor ─────▶ end     │   │  "%05d" + [Arg] ──▶ characters   │
//!   └───────────────────────────────┘   └──────────┬───────────────┬───────┘
//!                                                  │ stream        │ buffer
//!                                                  ▼               ▼
//!                                          CharSink::put(c)   &mut [u8]
//!                                          (simulator trap)   (NUL-terminated)
//! ```
//!
//! ## Heap Window
//!
//! The allocator hands out addresses from a window that defaults to the
//! simulator's heap at `0xee000000`:
//!
//! ```text
//!   0xee000000                                               0xee080000
//!   ┌─────┬──┬────────┬─────┬─────────────────────────────────────────┐
//!   │ A1  │░░│   A2   │ A3  │              Free Space                 │
//!   └─────┴──┴────────┴─────┴─────────────────────────────────────────┘
//!                           ▲
//!                           └── cursor (always word-aligned)
//!
//!   ░ = padding up to the next word. Nothing is ever freed.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   simrt
//!   ├── align      - Word alignment (align!, align_up)
//!   ├── arg        - Typed formatting arguments
//!   ├── bump       - BumpAllocator
//!   ├── config     - HeapConfig, the heap window boundaries
//!   ├── error      - AllocError, ConfigError, RegionError
//!   ├── format     - format_to_stream, format_to_buffer, printf!, snprintf!
//!   ├── heap       - SimHeap, a GlobalAlloc over a BumpAllocator
//!   ├── logger     - log backend printing through a CharSink
//!   ├── region     - HostRegion, mmap-backed window for hosts (unix)
//!   └── sink       - CharSink and its implementations
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use simrt::{Arg, BumpAllocator, HeapConfig, format_to_buffer};
//!
//! let mut heap = BumpAllocator::new(HeapConfig::DEFAULT);
//! let address = heap.allocate(10).unwrap();
//!
//! let mut line = [0u8; 32];
//! let len = format_to_buffer(&mut line, "block at %x", &[Arg::from(address)]);
//!
//! assert_eq!(&line[..len], b"block at ee000000");
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronisation anywhere
//! - **No reclamation**: `deallocate` is accepted and ignored
//! - **No floating point** and no locale handling in the formatter
//! - **Unknown directives are skipped** silently rather than reported

#![cfg_attr(not(test), no_std)]

pub mod align;
mod arg;
mod bump;
pub mod config;
mod error;
mod format;
mod heap;
pub mod logger;
#[cfg(unix)]
mod region;
pub mod sink;

pub use arg::{Arg, Length};
pub use bump::{Address, BumpAllocator};
pub use config::HeapConfig;
pub use error::{AllocError, ConfigError, RegionError};
pub use format::{format_to_buffer, format_to_stream};
pub use heap::SimHeap;
#[cfg(unix)]
pub use region::HostRegion;
pub use sink::CharSink;
