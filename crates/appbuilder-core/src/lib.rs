//! Core types and configuration for the Olares app builder.
//!
//! This crate defines the application [`Configuration`] assembled by the
//! wizard, its defaulting rules and [`derive_app_id`], the structural
//! validator ([`validate()`]), the service [`Settings`] (`appbuilder.toml`),
//! and shared error types.

pub mod appid;
pub mod config;
pub mod error;
pub mod model;
pub mod validate;

pub use appid::{derive_app_id, is_app_id};
pub use config::{GithubSettings, ServerSettings, Settings, StorageSettings, TemplateSettings};
pub use error::{Error, Result};
pub use model::{
    AppMount, AuthLevel, Category, Configuration, DockerImage, Entrance, EnvVar, Maintainer,
    Metadata, PersistentVolume, Port, PortKind, Probe, ProbeKind, Probes, Protocol, PullPolicy,
    ResourceAmounts, Resources, Storage,
};
pub use validate::validate;
