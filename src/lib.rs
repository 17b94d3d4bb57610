//! Comments is a client of the storefront comments API: public comment threads,
//! comment submission, the admin moderation console and the user's own comments.
//! The layered structure of the app is
//!
//! `Application -> Controller -> Service -> Provider`
//!
//! Each layer can throw Error with context or cover occurred error with
//! Error in the context. When error is not covered with Error it will
//! be shown as a generic localized failure notification.

#![recursion_limit = "128"]
extern crate chrono;
extern crate config as config_crate;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate futures_cpupool;
extern crate isolang;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate regex;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
#[cfg(test)]
extern crate tokio_core;
extern crate uuid;
extern crate validator;
#[macro_use]
extern crate validator_derive;

pub mod config;
pub mod controller;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use std::sync::Arc;

use failure::Error as FailureError;
use futures_cpupool::CpuPool;

use crate::config::Config;
use crate::controller::context::StaticContext;
use crate::providers::CommentsProviderImpl;
use crate::services::Service;

/// Builds the context shared by all panels from provided `Config`
pub fn create_static_context(config: Config) -> Result<StaticContext, FailureError> {
    let thread_count = config.api.thread_count;

    // Prepare CPU pool
    let cpu_pool = CpuPool::new(thread_count);

    let provider = CommentsProviderImpl::with_config(&config.api)?;
    let service = Service::new(cpu_pool, Arc::new(provider));

    info!("Using storefront API at {}, threads: {}", config.api.url, thread_count);
    Ok(StaticContext::new(Arc::new(config), service))
}
