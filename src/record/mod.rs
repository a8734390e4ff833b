// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Field schema and reconciliation of per-source rows into one job record.

pub mod combine;
pub mod format;
pub mod parser;
pub mod reconcile;
pub mod schema;
pub mod types;

pub use reconcile::reconcile;
pub use schema::parse_rows;
pub use types::Record;
