// pii-extract-plg-presidio - Presidio PII detection plugin
// Copyright (c) 2025 PIISA Contributors
// Licensed under the Apache License, Version 2.0

//! # Presidio PII extraction plugin
//!
//! A plugin for the PII extraction framework that wraps a Microsoft Presidio
//! analyzer engine and exposes it as one multi-language, multi-entity
//! detection task.
//!
//! ## Overview
//!
//! - **Configuration**: a packaged default mapping from Presidio entity
//!   labels to host PII types, with file or inline overrides
//! - **Task collection**: one task descriptor per request, restricted to the
//!   requested languages
//! - **Detection**: chunks are analyzed by the engine and the findings mapped
//!   back into host [`domain::PiiEntity`] values
//! - **Engine reuse**: analyzer engines are expensive, so tasks with the same
//!   effective engine configuration share one instance
//!
//! ## Architecture
//!
//! - [`plugin`] - Plugin entry point
//! - [`task`] - Task collector, entity mapping and the detection task
//! - [`engine`] - Analyzer engine contract, cache, factory and HTTP backend
//! - [`config`] - Configuration schema and loading
//! - [`domain`] - PII types, chunks, entities and errors
//! - [`logging`] - Logging setup
//! - [`cli`] - The `pii-presidio-info` command
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pii_extract_plg_presidio::domain::DocumentChunk;
//! use pii_extract_plg_presidio::task::PiiTask;
//! use pii_extract_plg_presidio::PiiExtractPluginLoader;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = PiiExtractPluginLoader::new(None, false, &[])?;
//! let tasks = loader.get_plugin_tasks(&["en".to_string()]);
//! let descriptor = &tasks[0];
//! let task = descriptor.build()?;
//!
//! let chunk = DocumentChunk::new("1", "My name is Alan Turing").with_lang("en");
//! for entity in task.find(&chunk)? {
//!     println!("{}", entity.as_dict());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type is
//! [`domain::PluginError`]. Configuration and engine construction errors make
//! a task unusable; language and detection errors only affect one chunk.

pub mod cli;
pub mod config;
pub mod defs;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod plugin;
pub mod task;

pub use plugin::PiiExtractPluginLoader;
