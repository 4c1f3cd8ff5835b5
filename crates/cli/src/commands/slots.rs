// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tofui slots`

use anyhow::Result;
use clap::Args;
use tofui_adapters::RemoteStore;
use tofui_core::{Occupancy, RotationKey, SystemClock};
use tofui_engine::{PublishError, PublishExecutor};

use super::{Store, StoreArgs, TargetArgs};
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{format_slots, OutputFormat};

#[derive(Args, Debug)]
pub struct SlotsArgs {
    #[command(flatten)]
    pub target: TargetArgs,
    #[command(flatten)]
    pub store: StoreArgs,
    #[arg(long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

pub async fn handle(args: SlotsArgs) -> Result<()> {
    let key = args.target.key()?;
    let occupancy = match args.store.open()? {
        Store::Dir(store) => read(store, &key).await,
        Store::GitHub(store) => read(store, &key).await,
    }
    .map_err(ExitError::from)?;
    println!("{}", format_slots(&key, &occupancy, args.output)?);
    Ok(())
}

async fn read<S: RemoteStore>(store: S, key: &RotationKey) -> Result<Occupancy, PublishError> {
    PublishExecutor::new(store, SystemClock, env::publish_config()).occupancy(key).await
}
