// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod auth;
pub mod forms;
pub mod model;
pub mod state;

pub use auth::*;
pub use forms::*;
pub use model::*;
pub use state::*;
