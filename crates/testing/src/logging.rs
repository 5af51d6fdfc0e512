// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use once_cell::sync::Lazy;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static SUBSCRIBER: Lazy<bool> = Lazy::new(|| {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let installed = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init().is_ok();
	if installed {
		debug!("test tracing initialized");
	}
	installed
});

/// Install a subscriber writing to the test harness output.
///
/// Honours `RUST_LOG` and defaults to `warn`. Safe to call from every test.
/// Returns whether this crate's subscriber is the one installed; another
/// global subscriber set up first is left in place.
pub fn init_tracing() -> bool {
	*Lazy::force(&SUBSCRIBER)
}
